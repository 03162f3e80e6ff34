#![deny(warnings)]

//! Action selection policies.
//!
//! The engine never picks actions itself. A policy looks at the current
//! state, takes the action pool for the turn's situation, and returns one
//! action that satisfies [`Action::is_usable`].

use craft_actions::Action;
use craft_core::{CraftState, MaterialCondition};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Openers; the only actions available on the first turn.
pub const FIRST_STEP_ACTIONS: [Action; 2] = [Action::MuscleMemory, Action::Reflect];

/// Pool used when the condition is Good, cheapest first (Final Appraisal last).
pub const GOOD_CONDITION_ACTIONS: [Action; 29] = [
    Action::TricksoftheTrade,
    Action::RapidSynthesis,
    Action::HastyTouch,
    Action::BasicSynthesis,
    Action::FocusedSynthesis,
    Action::IntensiveSynthesis,
    Action::PatientTouch,
    Action::BrandoftheElements,
    Action::CarefulSynthesis,
    Action::Observe,
    Action::Veneration,
    Action::Innovation,
    Action::BasicTouch,
    Action::PreciseTouch,
    Action::FocusedTouch,
    Action::InnerQuiet,
    Action::Groundwork,
    Action::ByregotsBlessing,
    Action::PrudentTouch,
    Action::NameoftheElements,
    Action::DelicateSynthesis,
    Action::StandardTouch,
    Action::GreatStrides,
    Action::PreparatoryTouch,
    Action::WasteNot,
    Action::MastersMend,
    Action::Manipulation,
    Action::WasteNot2,
    Action::FinalAppraisal,
];

/// Pool for every other condition; same order as the Good pool.
pub const STANDARD_ACTIONS: [Action; 26] = [
    Action::RapidSynthesis,
    Action::HastyTouch,
    Action::BasicSynthesis,
    Action::FocusedSynthesis,
    Action::PatientTouch,
    Action::BrandoftheElements,
    Action::CarefulSynthesis,
    Action::Observe,
    Action::Veneration,
    Action::Innovation,
    Action::BasicTouch,
    Action::FocusedTouch,
    Action::InnerQuiet,
    Action::Groundwork,
    Action::ByregotsBlessing,
    Action::PrudentTouch,
    Action::NameoftheElements,
    Action::DelicateSynthesis,
    Action::StandardTouch,
    Action::GreatStrides,
    Action::PreparatoryTouch,
    Action::WasteNot,
    Action::MastersMend,
    Action::Manipulation,
    Action::WasteNot2,
    Action::FinalAppraisal,
];

/// Pool of candidate actions for the state's turn and condition.
pub fn action_pool(state: &CraftState) -> &'static [Action] {
    if state.step_number == 0 {
        &FIRST_STEP_ACTIONS
    } else if state.material_condition == MaterialCondition::Good {
        &GOOD_CONDITION_ACTIONS
    } else {
        &STANDARD_ACTIONS
    }
}

/// Usable actions from the state's pool, in pool order.
pub fn eligible_actions(state: &CraftState) -> Vec<Action> {
    action_pool(state)
        .iter()
        .copied()
        .filter(|a| a.is_usable(state))
        .collect()
}

/// Policy interface for choosing the next action.
pub trait ActionPolicy {
    /// Name used for logging.
    fn name(&self) -> &'static str;

    /// Pick the action to play this turn.
    fn choose(&mut self, state: &CraftState) -> Action;
}

/// Uniform pick among eligible actions of the current pool.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    /// Policy backed by a ChaCha8 stream seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ActionPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, state: &CraftState) -> Action {
        let eligible = eligible_actions(state);
        // Basic Synthesis is in every non-opening pool and never restricted.
        let action = eligible
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::BasicSynthesis);
        debug!(step = state.step_number, candidates = eligible.len(), %action, "random pick");
        action
    }
}

/// Replays a fixed action list, then falls back to Basic Synthesis.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    actions: Vec<Action>,
    cursor: usize,
}

impl ScriptedPolicy {
    /// Play `actions` in order, one per turn.
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions, cursor: 0 }
    }
}

impl ActionPolicy for ScriptedPolicy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn choose(&mut self, _state: &CraftState) -> Action {
        let action = self
            .actions
            .get(self.cursor)
            .copied()
            .unwrap_or(Action::BasicSynthesis);
        self.cursor += 1;
        action
    }
}
