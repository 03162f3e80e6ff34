#![deny(warnings)]

//! Core domain model for the crafting simulator.
//!
//! This crate defines the craft state threaded through every action, the
//! per-turn material condition, the fixed character/recipe constants, and a
//! validation helper that checks the state's invariants.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Crafter craftsmanship stat.
pub const CRAFTSMANSHIP: i32 = 2689;
/// Crafter control stat.
pub const CONTROL: i32 = 2872;
/// Crafter level (informational; not used by the formulas).
pub const CRAFTER_LEVEL: i32 = 420;
/// Recipe level (informational; not used by the formulas).
pub const RECIPE_LEVEL: i32 = 511;
/// Recipe craftsmanship divisor term.
pub const RECIPE_CRAFTSMANSHIP: i32 = 2620;
/// Recipe control divisor term.
pub const RECIPE_CONTROL: i32 = 2540;

/// Progress required to complete the craft.
pub const MAX_PROGRESS: i32 = 11126;
/// Quality cap.
pub const MAX_QUALITY: i32 = 82400;
/// Durability cap for restoring actions; also the starting durability.
pub const MAX_DURABILITY: i32 = 50;
/// CP cap for restoring actions; also the starting CP.
pub const MAX_CP: i32 = 572;
/// Maximum Inner Quiet stacks.
pub const MAX_IQ_STACKS: i32 = 11;
/// Largest success roll a turn may carry.
pub const MAX_SUCCESS_VAL: i32 = 99;

/// Per-turn material condition rolled outside the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCondition {
    /// No modifier.
    #[default]
    Normal,
    /// Quality output x1.5; unlocks good-only actions.
    Good,
    /// CP costs roughly halved.
    Pliant,
    /// Durability costs roughly halved.
    Sturdy,
    /// Success thresholds raised by 25.
    Centered,
}

impl MaterialCondition {
    /// All conditions in roll-table order.
    pub const ALL: [MaterialCondition; 5] = [
        MaterialCondition::Normal,
        MaterialCondition::Good,
        MaterialCondition::Pliant,
        MaterialCondition::Sturdy,
        MaterialCondition::Centered,
    ];

    /// Lowercase name, matching the serde encoding.
    pub fn label(self) -> &'static str {
        match self {
            MaterialCondition::Normal => "normal",
            MaterialCondition::Good => "good",
            MaterialCondition::Pliant => "pliant",
            MaterialCondition::Sturdy => "sturdy",
            MaterialCondition::Centered => "centered",
        }
    }
}

impl fmt::Display for MaterialCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable record of one craft attempt.
///
/// Buff fields are "turns remaining" counters: a buff is active while its
/// counter is above zero, and the sequencer decrements every nonzero counter
/// once per completed turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftState {
    /// Accumulated progress, in [0, MAX_PROGRESS].
    pub progress: i32,
    /// Accumulated quality, in [0, MAX_QUALITY].
    pub quality: i32,
    /// Remaining durability; may go negative, which fails the attempt.
    pub durability: i32,
    /// Remaining CP; may go negative, which fails the attempt.
    pub cp: i32,
    /// Condition rolled for the current turn.
    pub material_condition: MaterialCondition,
    /// Success roll for the current turn, in [0, 99].
    pub success_val: i32,
    pub muscle_memory: i32,
    pub veneration: i32,
    pub innovation: i32,
    pub great_strides: i32,
    pub waste_not: i32,
    pub manipulation: i32,
    pub observe: i32,
    pub name_elements: i32,
    pub final_appraisal: i32,
    /// Inner Quiet stacks; 0 means the buff was never activated.
    pub iq_stacks: i32,
    /// Zero-based turn index.
    pub step_number: u32,
}

impl Default for CraftState {
    fn default() -> Self {
        Self::new()
    }
}

impl CraftState {
    /// Fresh state at full durability and CP.
    pub fn new() -> Self {
        Self::with_resources(MAX_DURABILITY, MAX_CP)
    }

    /// Fresh state with explicit starting durability and CP.
    pub fn with_resources(durability: i32, cp: i32) -> Self {
        Self {
            progress: 0,
            quality: 0,
            durability,
            cp,
            material_condition: MaterialCondition::Normal,
            success_val: 0,
            muscle_memory: 0,
            veneration: 0,
            innovation: 0,
            great_strides: 0,
            waste_not: 0,
            manipulation: 0,
            observe: 0,
            name_elements: 0,
            final_appraisal: 0,
            iq_stacks: 0,
            step_number: 0,
        }
    }

    /// Whether progress has reached the completion threshold.
    pub fn is_complete(&self) -> bool {
        self.progress >= MAX_PROGRESS
    }

    /// Whether Inner Quiet has been activated.
    pub fn inner_quiet_active(&self) -> bool {
        self.iq_stacks > 0
    }

    /// Decrement every active buff counter by one.
    ///
    /// Inner Quiet stacks are not a timer and are left untouched.
    pub fn decrement_buffs(&mut self) {
        for counter in self.buff_counters_mut() {
            if *counter > 0 {
                *counter -= 1;
            }
        }
    }

    /// Named view over the buff counters, in declaration order.
    pub fn buff_counters(&self) -> [(&'static str, i32); 9] {
        [
            ("muscle_memory", self.muscle_memory),
            ("veneration", self.veneration),
            ("innovation", self.innovation),
            ("great_strides", self.great_strides),
            ("waste_not", self.waste_not),
            ("manipulation", self.manipulation),
            ("observe", self.observe),
            ("name_elements", self.name_elements),
            ("final_appraisal", self.final_appraisal),
        ]
    }

    fn buff_counters_mut(&mut self) -> [&mut i32; 9] {
        [
            &mut self.muscle_memory,
            &mut self.veneration,
            &mut self.innovation,
            &mut self.great_strides,
            &mut self.waste_not,
            &mut self.manipulation,
            &mut self.observe,
            &mut self.name_elements,
            &mut self.final_appraisal,
        ]
    }
}

/// Invariant violations detected by [`validate_state`].
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Progress outside [0, MAX_PROGRESS].
    #[error("progress {0} is out of range [0, 11126]")]
    ProgressOutOfRange(i32),
    /// Quality outside [0, MAX_QUALITY].
    #[error("quality {0} is out of range [0, 82400]")]
    QualityOutOfRange(i32),
    /// Durability above its cap.
    #[error("durability {0} exceeds cap 50")]
    DurabilityAboveCap(i32),
    /// CP above its cap.
    #[error("cp {0} exceeds cap 572")]
    CpAboveCap(i32),
    /// Inner Quiet stacks outside [0, MAX_IQ_STACKS].
    #[error("inner quiet stacks {0} out of range [0, 11]")]
    IqStacksOutOfRange(i32),
    /// A buff counter went negative.
    #[error("buff counter {name} is negative ({value})")]
    NegativeBuff { name: &'static str, value: i32 },
    /// Success roll outside [0, MAX_SUCCESS_VAL].
    #[error("success value {0} out of range [0, 99]")]
    SuccessValOutOfRange(i32),
}

/// Validate the craft state invariants.
///
/// Negative durability and CP are legal here: they mark a failed attempt,
/// which is for the caller to classify.
pub fn validate_state(state: &CraftState) -> Result<(), ValidationError> {
    if !(0..=MAX_PROGRESS).contains(&state.progress) {
        return Err(ValidationError::ProgressOutOfRange(state.progress));
    }
    if !(0..=MAX_QUALITY).contains(&state.quality) {
        return Err(ValidationError::QualityOutOfRange(state.quality));
    }
    if state.durability > MAX_DURABILITY {
        return Err(ValidationError::DurabilityAboveCap(state.durability));
    }
    if state.cp > MAX_CP {
        return Err(ValidationError::CpAboveCap(state.cp));
    }
    if !(0..=MAX_IQ_STACKS).contains(&state.iq_stacks) {
        return Err(ValidationError::IqStacksOutOfRange(state.iq_stacks));
    }
    for (name, value) in state.buff_counters() {
        if value < 0 {
            return Err(ValidationError::NegativeBuff { name, value });
        }
    }
    if !(0..=MAX_SUCCESS_VAL).contains(&state.success_val) {
        return Err(ValidationError::SuccessValOutOfRange(state.success_val));
    }
    Ok(())
}
