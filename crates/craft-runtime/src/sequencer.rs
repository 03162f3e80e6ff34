//! Turn sequencer: the caller contract every action runs under.
//!
//! Each turn the sequencer stamps the rolled condition and success value onto
//! the state, executes one action, applies Manipulation's per-turn restore,
//! then decrements every active buff counter, including any counter the
//! action just set.

use craft_actions::{Action, ActionOutcome};
use craft_core::{CraftState, MaterialCondition, MAX_DURABILITY};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Durability restored per turn while Manipulation is running.
pub const MANIPULATION_RESTORE: i32 = 5;

/// Where an attempt stands after a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftStatus {
    InProgress,
    /// Progress reached the maximum.
    Completed,
    /// Durability ran out before completion.
    Broken,
    /// The last action cost more CP than was left.
    OutOfCp,
}

impl CraftStatus {
    /// Classify a state. An overdrawn CP pool wins over completion, since the
    /// action could not have been paid for.
    pub fn of(state: &CraftState) -> Self {
        if state.cp < 0 {
            CraftStatus::OutOfCp
        } else if state.is_complete() {
            CraftStatus::Completed
        } else if state.durability <= 0 {
            CraftStatus::Broken
        } else {
            CraftStatus::InProgress
        }
    }

    /// Anything but [`CraftStatus::InProgress`].
    pub fn is_finished(self) -> bool {
        self != CraftStatus::InProgress
    }
}

/// Everything that happened in one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub action: Action,
    pub condition: MaterialCondition,
    pub success_val: i32,
    pub outcome: ActionOutcome,
    /// Durability restored by Manipulation at the end of the turn.
    pub restored: i32,
    /// State after buff decay.
    pub state: CraftState,
    pub status: CraftStatus,
}

/// Owns one craft attempt's state and advances it a turn at a time.
#[derive(Clone, Debug)]
pub struct Sequencer {
    state: CraftState,
}

impl Sequencer {
    /// Take ownership of a starting state; play begins at its `step_number`.
    pub fn new(state: CraftState) -> Self {
        Self { state }
    }

    /// Current state, as the policy should see it.
    pub fn state(&self) -> &CraftState {
        &self.state
    }

    /// Hand back the final state.
    pub fn into_state(self) -> CraftState {
        self.state
    }

    /// Index of the turn about to be played.
    pub fn turn(&self) -> u32 {
        self.state.step_number
    }

    /// [`CraftStatus::of`] the current state.
    pub fn status(&self) -> CraftStatus {
        CraftStatus::of(&self.state)
    }

    /// Stamp this turn's external inputs onto the state.
    pub fn begin_turn(&mut self, condition: MaterialCondition, success_val: i32) {
        self.state.material_condition = condition;
        self.state.success_val = success_val;
    }

    /// Execute `action` as this turn's move and close the turn.
    ///
    /// Manipulation restores only on turns that start with it running, so the
    /// granting turn does not restore. No restore happens once the craft is
    /// complete or broken.
    pub fn play(&mut self, action: Action) -> TurnRecord {
        let turn = self.state.step_number;
        let condition = self.state.material_condition;
        let success_val = self.state.success_val;
        let manipulating = self.state.manipulation > 0;

        let outcome = action.execute(&mut self.state);

        let mut restored = 0;
        if manipulating && self.state.durability > 0 && !self.state.is_complete() {
            let before = self.state.durability;
            self.state.durability = (before + MANIPULATION_RESTORE).min(MAX_DURABILITY);
            restored = self.state.durability - before;
        }

        self.state.decrement_buffs();
        self.state.step_number += 1;
        let status = self.status();

        debug!(
            turn,
            %action,
            %condition,
            success = outcome.success,
            progress_delta = outcome.progress_delta,
            quality_delta = outcome.quality_delta,
            progress = self.state.progress,
            quality = self.state.quality,
            durability = self.state.durability,
            cp = self.state.cp,
            ?status,
            "turn played"
        );

        TurnRecord {
            turn,
            action,
            condition,
            success_val,
            outcome,
            restored,
            state: self.state,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craft_core::MAX_CP;

    fn play_normal(seq: &mut Sequencer, action: Action) -> TurnRecord {
        seq.begin_turn(MaterialCondition::Normal, 0);
        seq.play(action)
    }

    #[test]
    fn muscle_memory_then_basic_synthesis() {
        let mut seq = Sequencer::new(CraftState::new());
        let opener = play_normal(&mut seq, Action::MuscleMemory);
        assert_eq!(opener.outcome.progress_delta, 1365);
        assert_eq!(seq.state().muscle_memory, 5);
        assert_eq!(seq.turn(), 1);

        let boosted = play_normal(&mut seq, Action::BasicSynthesis);
        assert_eq!(boosted.outcome.progress_delta, 1092);
        assert_eq!(seq.state().muscle_memory, 0);

        let plain = play_normal(&mut seq, Action::BasicSynthesis);
        assert_eq!(plain.outcome.progress_delta, 546);
        assert!(boosted.outcome.progress_delta > plain.outcome.progress_delta);
        assert_eq!(seq.state().progress, 1365 + 1092 + 546);
        assert_eq!(seq.state().durability, 20);
        assert_eq!(seq.state().cp, MAX_CP - 6);
    }

    #[test]
    fn buffs_decay_on_their_granting_turn() {
        let mut seq = Sequencer::new(CraftState::new());
        play_normal(&mut seq, Action::Reflect);
        play_normal(&mut seq, Action::Veneration);
        assert_eq!(seq.state().veneration, 4);
        play_normal(&mut seq, Action::Observe);
        assert_eq!(seq.state().observe, 1);
        assert_eq!(seq.state().veneration, 3);
        assert_eq!(seq.state().iq_stacks, 3);
    }

    #[test]
    fn waste_not_covers_four_turns() {
        let mut state = CraftState::new();
        state.step_number = 1;
        let mut seq = Sequencer::new(state);
        play_normal(&mut seq, Action::WasteNot);
        assert_eq!(seq.state().waste_not, 4);

        for expected_before in [4, 3, 2, 1] {
            assert_eq!(seq.state().waste_not, expected_before);
            let record = play_normal(&mut seq, Action::BasicSynthesis);
            assert_eq!(record.outcome.durability_spent, 5);
        }
        assert_eq!(seq.state().waste_not, 0);

        let record = play_normal(&mut seq, Action::BasicSynthesis);
        assert_eq!(record.outcome.durability_spent, 10);
        assert_eq!(seq.state().waste_not, 0);
    }

    #[test]
    fn manipulation_restores_for_eight_turns() {
        let mut state = CraftState::with_resources(10, MAX_CP);
        state.step_number = 1;
        let mut seq = Sequencer::new(state);
        let grant = play_normal(&mut seq, Action::Manipulation);
        assert_eq!(grant.restored, 0);
        assert_eq!(seq.state().durability, 10);

        let restored: Vec<i32> = (0..10)
            .map(|_| play_normal(&mut seq, Action::Observe).restored)
            .collect();
        assert_eq!(restored, vec![5, 5, 5, 5, 5, 5, 5, 5, 0, 0]);
        assert_eq!(seq.state().durability, 50);
        assert_eq!(seq.state().manipulation, 0);
    }

    #[test]
    fn manipulation_respects_cap_and_pays_after_action() {
        let mut state = CraftState::new();
        state.step_number = 1;
        state.manipulation = 3;
        let mut seq = Sequencer::new(state);
        let record = play_normal(&mut seq, Action::Observe);
        assert_eq!(record.restored, 0);
        let record = play_normal(&mut seq, Action::BasicTouch);
        assert_eq!(record.restored, 5);
        assert_eq!(seq.state().durability, 45);
    }

    #[test]
    fn no_restore_once_broken() {
        let mut state = CraftState::with_resources(10, MAX_CP);
        state.step_number = 1;
        state.manipulation = 4;
        let mut seq = Sequencer::new(state);
        let record = play_normal(&mut seq, Action::BasicSynthesis);
        assert_eq!(record.restored, 0);
        assert_eq!(record.status, CraftStatus::Broken);
    }

    #[test]
    fn status_precedence() {
        let mut s = CraftState::new();
        assert_eq!(CraftStatus::of(&s), CraftStatus::InProgress);
        s.progress = craft_core::MAX_PROGRESS;
        s.durability = 0;
        assert_eq!(CraftStatus::of(&s), CraftStatus::Completed);
        s.cp = -1;
        assert_eq!(CraftStatus::of(&s), CraftStatus::OutOfCp);
        s.cp = 0;
        s.progress = 0;
        assert_eq!(CraftStatus::of(&s), CraftStatus::Broken);
        assert!(CraftStatus::Broken.is_finished());
    }
}
