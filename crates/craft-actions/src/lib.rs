#![deny(warnings)]

//! Action catalog: every crafting action as one variant of [`Action`].
//!
//! An action reads the turn's pre-rolled condition and success value from the
//! [`CraftState`], applies its effect through the shared progress/quality
//! models, pays its durability and CP cost, and sets its own buff counters.
//! Eligibility is exposed through [`Action::is_usable`] but never enforced by
//! [`Action::execute`]; callers filter before invoking.

mod cost;

use craft_core::{
    CraftState, MaterialCondition, MAX_CP, MAX_DURABILITY, MAX_IQ_STACKS, MAX_PROGRESS,
    MAX_QUALITY,
};
use craft_model::{apply_progress, apply_quality, apply_scaled_progress};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// All crafting actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    BasicSynthesis,
    RapidSynthesis,
    CarefulSynthesis,
    Groundwork,
    IntensiveSynthesis,
    MuscleMemory,
    BrandoftheElements,
    NameoftheElements,
    Veneration,
    FinalAppraisal,
    DelicateSynthesis,
    BasicTouch,
    HastyTouch,
    StandardTouch,
    PreparatoryTouch,
    PreciseTouch,
    PatientTouch,
    PrudentTouch,
    Reflect,
    ByregotsBlessing,
    GreatStrides,
    Innovation,
    InnerQuiet,
    Observe,
    FocusedSynthesis,
    FocusedTouch,
    TricksoftheTrade,
    WasteNot,
    WasteNot2,
    MastersMend,
    Manipulation,
}

/// Which accumulator or resource an action works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Progress,
    Quality,
    /// Progress and quality in one action.
    Both,
    /// Only sets a buff counter.
    Buff,
    /// Restores CP or durability.
    Resource,
}

/// What a single execution did, measured on the state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Whether the success roll passed (always true for non-probabilistic actions).
    pub success: bool,
    pub progress_delta: i32,
    pub quality_delta: i32,
    /// CP debited; negative when CP was restored.
    pub cp_spent: i32,
    /// Durability debited; negative when durability was restored.
    pub durability_spent: i32,
}

impl Action {
    /// Catalog order.
    pub const ALL: [Action; 31] = [
        Action::BasicSynthesis,
        Action::RapidSynthesis,
        Action::CarefulSynthesis,
        Action::Groundwork,
        Action::IntensiveSynthesis,
        Action::MuscleMemory,
        Action::BrandoftheElements,
        Action::NameoftheElements,
        Action::Veneration,
        Action::FinalAppraisal,
        Action::DelicateSynthesis,
        Action::BasicTouch,
        Action::HastyTouch,
        Action::StandardTouch,
        Action::PreparatoryTouch,
        Action::PreciseTouch,
        Action::PatientTouch,
        Action::PrudentTouch,
        Action::Reflect,
        Action::ByregotsBlessing,
        Action::GreatStrides,
        Action::Innovation,
        Action::InnerQuiet,
        Action::Observe,
        Action::FocusedSynthesis,
        Action::FocusedTouch,
        Action::TricksoftheTrade,
        Action::WasteNot,
        Action::WasteNot2,
        Action::MastersMend,
        Action::Manipulation,
    ];

    /// In-game display name, e.g. `"Byregot's Blessing"`.
    pub fn name(self) -> &'static str {
        match self {
            Action::BasicSynthesis => "Basic Synthesis",
            Action::RapidSynthesis => "Rapid Synthesis",
            Action::CarefulSynthesis => "Careful Synthesis",
            Action::Groundwork => "Groundwork",
            Action::IntensiveSynthesis => "Intensive Synthesis",
            Action::MuscleMemory => "Muscle Memory",
            Action::BrandoftheElements => "Brand of the Elements",
            Action::NameoftheElements => "Name of the Elements",
            Action::Veneration => "Veneration",
            Action::FinalAppraisal => "Final Appraisal",
            Action::DelicateSynthesis => "Delicate Synthesis",
            Action::BasicTouch => "Basic Touch",
            Action::HastyTouch => "Hasty Touch",
            Action::StandardTouch => "Standard Touch",
            Action::PreparatoryTouch => "Preparatory Touch",
            Action::PreciseTouch => "Precise Touch",
            Action::PatientTouch => "Patient Touch",
            Action::PrudentTouch => "Prudent Touch",
            Action::Reflect => "Reflect",
            Action::ByregotsBlessing => "Byregot's Blessing",
            Action::GreatStrides => "Great Strides",
            Action::Innovation => "Innovation",
            Action::InnerQuiet => "Inner Quiet",
            Action::Observe => "Observe",
            Action::FocusedSynthesis => "Focused Synthesis",
            Action::FocusedTouch => "Focused Touch",
            Action::TricksoftheTrade => "Tricks of the Trade",
            Action::WasteNot => "Waste Not",
            Action::WasteNot2 => "Waste Not II",
            Action::MastersMend => "Master's Mend",
            Action::Manipulation => "Manipulation",
        }
    }

    /// What the action works on. Delicate Synthesis is the only [`Target::Both`].
    ///
    /// Example:
    /// ```
    /// use craft_actions::{Action, Target};
    /// assert_eq!(Action::Groundwork.target(), Target::Progress);
    /// assert_eq!(Action::InnerQuiet.target(), Target::Buff);
    /// ```
    pub fn target(self) -> Target {
        use Action::*;
        match self {
            BasicSynthesis | RapidSynthesis | CarefulSynthesis | Groundwork
            | IntensiveSynthesis | MuscleMemory | BrandoftheElements | FocusedSynthesis => {
                Target::Progress
            }
            BasicTouch | HastyTouch | StandardTouch | PreparatoryTouch | PreciseTouch
            | PatientTouch | PrudentTouch | Reflect | ByregotsBlessing | FocusedTouch => {
                Target::Quality
            }
            DelicateSynthesis => Target::Both,
            NameoftheElements | Veneration | FinalAppraisal | GreatStrides | Innovation
            | InnerQuiet | Observe | WasteNot | WasteNot2 | Manipulation => Target::Buff,
            TricksoftheTrade | MastersMend => Target::Resource,
        }
    }

    /// CP price under the given condition; negative for CP-restoring actions.
    pub fn cp_cost(self, condition: MaterialCondition) -> i32 {
        self.cp_table().resolve(condition)
    }

    /// Durability price given the active Waste Not buff and condition.
    pub fn durability_cost(self, state: &CraftState) -> i32 {
        self.durability_table().resolve(state)
    }

    /// Whether the turn's success roll lands this action's effect.
    pub fn succeeds(self, state: &CraftState) -> bool {
        match self.success_rule().threshold(state) {
            Some(threshold) => state.success_val <= threshold,
            None => true,
        }
    }

    /// Eligibility rules a selection policy must honor.
    ///
    /// - Muscle Memory and Reflect are the only actions on the first turn,
    ///   and only usable then.
    /// - Intensive Synthesis, Precise Touch and Tricks of the Trade need a
    ///   Good condition.
    /// - Prudent Touch is blocked by Waste Not; Inner Quiet by existing
    ///   stacks; duration buffs by themselves while still running.
    pub fn is_usable(self, state: &CraftState) -> bool {
        use Action::*;
        let first_step = state.step_number == 0;
        match self {
            MuscleMemory | Reflect => first_step,
            _ if first_step => false,
            IntensiveSynthesis | PreciseTouch | TricksoftheTrade => {
                state.material_condition == MaterialCondition::Good
            }
            PrudentTouch => state.waste_not == 0,
            InnerQuiet => !state.inner_quiet_active(),
            NameoftheElements => state.name_elements == 0,
            Veneration => state.veneration == 0,
            GreatStrides => state.great_strides == 0,
            Innovation => state.innovation == 0,
            Manipulation => state.manipulation == 0,
            _ => true,
        }
    }

    /// Apply this action to the state for the current turn.
    ///
    /// A failed success roll skips the effect but still pays the full cost.
    pub fn execute(self, state: &mut CraftState) -> ActionOutcome {
        let before = *state;
        let durability_cost = self.durability_cost(state);
        let cp_cost = self.cp_cost(state.material_condition);
        let success = self.succeeds(state);

        if success {
            self.apply_effect(state, durability_cost);
        } else {
            trace!(action = %self, roll = state.success_val, "success roll failed");
            self.apply_failure(state);
        }

        state.durability -= durability_cost;
        if cp_cost < 0 {
            state.cp = (state.cp - cp_cost).min(MAX_CP);
        } else {
            state.cp -= cp_cost;
        }

        ActionOutcome {
            success,
            progress_delta: state.progress - before.progress,
            quality_delta: state.quality - before.quality,
            cp_spent: before.cp - state.cp,
            durability_spent: before.durability - state.durability,
        }
    }

    // Buff counters are granted one turn longer than the buff lasts: the
    // sequencer decrements them at the end of the granting turn too.
    fn apply_effect(self, state: &mut CraftState, durability_cost: i32) {
        use Action::*;
        match self {
            BasicSynthesis => synthesize(state, 120),
            RapidSynthesis => synthesize(state, 500),
            CarefulSynthesis => synthesize(state, 150),
            Groundwork => {
                let efficiency = if state.durability < durability_cost { 150 } else { 300 };
                synthesize(state, efficiency);
            }
            IntensiveSynthesis => synthesize(state, 300),
            MuscleMemory => {
                synthesize(state, 300);
                state.muscle_memory = 6;
            }
            BrandoftheElements => {
                let delta = apply_scaled_progress(state, 100);
                add_progress(state, delta);
            }
            FocusedSynthesis => synthesize(state, 200),
            DelicateSynthesis => {
                synthesize(state, 100);
                touch(state, 100);
            }
            BasicTouch | HastyTouch | PrudentTouch => touch(state, 100),
            StandardTouch => touch(state, 125),
            FocusedTouch => touch(state, 150),
            PreparatoryTouch => {
                touch(state, 200);
                grow_inner_quiet(state);
            }
            PreciseTouch => {
                touch(state, 150);
                grow_inner_quiet(state);
            }
            PatientTouch => {
                touch(state, 100);
                // The formula already added a stack; double the pre-touch count.
                if state.iq_stacks > 0 && state.iq_stacks < MAX_IQ_STACKS {
                    state.iq_stacks = ((state.iq_stacks - 1) * 2).min(MAX_IQ_STACKS);
                }
            }
            Reflect => {
                touch(state, 100);
                state.iq_stacks = 3;
            }
            ByregotsBlessing => {
                let efficiency = 100 + 20 * (state.iq_stacks - 1);
                let delta = apply_quality(state, efficiency);
                state.iq_stacks = 0;
                add_quality(state, delta);
            }
            NameoftheElements => state.name_elements = 4,
            Veneration => state.veneration = 5,
            FinalAppraisal => state.final_appraisal = 6,
            GreatStrides => state.great_strides = 4,
            Innovation => state.innovation = 5,
            InnerQuiet => state.iq_stacks = 1,
            Observe => state.observe = 2,
            WasteNot => state.waste_not = 5,
            WasteNot2 => state.waste_not = 9,
            Manipulation => state.manipulation = 9,
            MastersMend => state.durability = (state.durability + 30).min(MAX_DURABILITY),
            // CP restoration is its negative cost.
            TricksoftheTrade => {}
        }
    }

    fn apply_failure(self, state: &mut CraftState) {
        if self == Action::PatientTouch && state.iq_stacks > 0 {
            state.iq_stacks = (state.iq_stacks + 1) / 2;
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn synthesize(state: &mut CraftState, efficiency: i32) {
    let delta = apply_progress(state, efficiency);
    add_progress(state, delta);
}

fn touch(state: &mut CraftState, efficiency: i32) {
    let delta = apply_quality(state, efficiency);
    add_quality(state, delta);
}

/// Add progress, clamping at completion. Final Appraisal holds the craft one
/// point short and is consumed; it never pulls back a craft already at max.
fn add_progress(state: &mut CraftState, delta: i32) {
    let mut progress = state.progress + delta;
    if progress >= MAX_PROGRESS {
        progress = MAX_PROGRESS;
        if state.final_appraisal > 0 && state.progress < MAX_PROGRESS {
            state.final_appraisal = 0;
            progress -= 1;
        }
    }
    state.progress = progress;
}

fn add_quality(state: &mut CraftState, delta: i32) {
    state.quality = (state.quality + delta).min(MAX_QUALITY);
}

fn grow_inner_quiet(state: &mut CraftState) {
    if state.iq_stacks > 0 && state.iq_stacks < MAX_IQ_STACKS {
        state.iq_stacks += 1;
    }
}
