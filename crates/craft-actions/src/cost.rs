//! Cost tables and success rules for the action catalog.

use crate::Action;
use craft_core::{CraftState, MaterialCondition};

/// How an action's durability cost reacts to Waste Not and Sturdy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DurabilityCost {
    /// Costs no durability.
    Free,
    /// Never discounted.
    Fixed(i32),
    /// Discounted by Waste Not and Sturdy, with a deeper cut when both apply.
    Standard { base: i32, both: i32, either: i32 },
    /// Good-only actions: Sturdy cannot coincide, so only Waste Not applies.
    WasteNotOnly { base: i32, reduced: i32 },
    /// Unusable under Waste Not, so only Sturdy applies.
    SturdyOnly { base: i32, reduced: i32 },
}

const STANDARD_10: DurabilityCost = DurabilityCost::Standard {
    base: 10,
    both: 3,
    either: 5,
};

const STANDARD_20: DurabilityCost = DurabilityCost::Standard {
    base: 20,
    both: 5,
    either: 10,
};

impl DurabilityCost {
    pub(crate) fn resolve(self, state: &CraftState) -> i32 {
        let waste_not = state.waste_not > 0;
        let sturdy = state.material_condition == MaterialCondition::Sturdy;
        match self {
            DurabilityCost::Free => 0,
            DurabilityCost::Fixed(base) => base,
            DurabilityCost::Standard { base, both, either } => match (waste_not, sturdy) {
                (true, true) => both,
                (true, false) | (false, true) => either,
                (false, false) => base,
            },
            DurabilityCost::WasteNotOnly { base, reduced } => {
                if waste_not {
                    reduced
                } else {
                    base
                }
            }
            DurabilityCost::SturdyOnly { base, reduced } => {
                if sturdy {
                    reduced
                } else {
                    base
                }
            }
        }
    }
}

/// CP price under normal and pliant conditions. Negative prices restore CP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CpCost {
    pub normal: i32,
    pub pliant: i32,
}

impl CpCost {
    const fn new(normal: i32, pliant: i32) -> Self {
        Self { normal, pliant }
    }

    pub(crate) fn resolve(self, condition: MaterialCondition) -> i32 {
        if condition == MaterialCondition::Pliant {
            self.pliant
        } else {
            self.normal
        }
    }
}

/// When a probabilistic action lands its effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SuccessRule {
    Always,
    /// Succeeds iff `success_val <= threshold`; Centered adds 25.
    Chance(i32),
    /// 50% baseline, guaranteed while Observe is active.
    Focused,
}

const CENTERED_BONUS: i32 = 25;
const GUARANTEED: i32 = 100;

impl SuccessRule {
    /// Threshold the success roll is compared against, or `None` if the
    /// action cannot fail.
    pub(crate) fn threshold(self, state: &CraftState) -> Option<i32> {
        let centered = state.material_condition == MaterialCondition::Centered;
        match self {
            SuccessRule::Always => None,
            SuccessRule::Chance(base) => Some(if centered { base + CENTERED_BONUS } else { base }),
            SuccessRule::Focused => Some(if state.observe > 0 {
                GUARANTEED
            } else if centered {
                49 + CENTERED_BONUS
            } else {
                49
            }),
        }
    }
}

impl Action {
    pub(crate) fn cp_table(self) -> CpCost {
        use Action::*;
        match self {
            BasicSynthesis | RapidSynthesis | HastyTouch => CpCost::new(0, 0),
            CarefulSynthesis | Observe => CpCost::new(7, 4),
            Groundwork | Veneration | BasicTouch | FocusedTouch | Innovation | InnerQuiet => {
                CpCost::new(18, 9)
            }
            IntensiveSynthesis => CpCost::new(6, 6),
            MuscleMemory | BrandoftheElements | PatientTouch => CpCost::new(6, 3),
            NameoftheElements => CpCost::new(30, 15),
            FinalAppraisal => CpCost::new(1, 1),
            DelicateSynthesis | StandardTouch | GreatStrides => CpCost::new(32, 16),
            PreparatoryTouch => CpCost::new(40, 20),
            PreciseTouch => CpCost::new(18, 18),
            PrudentTouch => CpCost::new(25, 13),
            Reflect | ByregotsBlessing => CpCost::new(24, 12),
            FocusedSynthesis => CpCost::new(5, 3),
            TricksoftheTrade => CpCost::new(-20, -20),
            WasteNot => CpCost::new(56, 28),
            WasteNot2 => CpCost::new(98, 49),
            MastersMend => CpCost::new(88, 44),
            Manipulation => CpCost::new(96, 48),
        }
    }

    pub(crate) fn durability_table(self) -> DurabilityCost {
        use Action::*;
        match self {
            BasicSynthesis | RapidSynthesis | CarefulSynthesis | BrandoftheElements
            | DelicateSynthesis | BasicTouch | HastyTouch | StandardTouch | PatientTouch
            | ByregotsBlessing | FocusedSynthesis | FocusedTouch => STANDARD_10,
            Groundwork | PreparatoryTouch => STANDARD_20,
            IntensiveSynthesis | PreciseTouch => DurabilityCost::WasteNotOnly {
                base: 10,
                reduced: 5,
            },
            MuscleMemory | Reflect => DurabilityCost::Fixed(10),
            PrudentTouch => DurabilityCost::SturdyOnly {
                base: 5,
                reduced: 3,
            },
            NameoftheElements | Veneration | FinalAppraisal | GreatStrides | Innovation
            | InnerQuiet | Observe | TricksoftheTrade | WasteNot | WasteNot2 | MastersMend
            | Manipulation => DurabilityCost::Free,
        }
    }

    pub(crate) fn success_rule(self) -> SuccessRule {
        match self {
            Action::RapidSynthesis | Action::PatientTouch => SuccessRule::Chance(49),
            Action::HastyTouch => SuccessRule::Chance(59),
            Action::FocusedSynthesis | Action::FocusedTouch => SuccessRule::Focused,
            _ => SuccessRule::Always,
        }
    }
}
