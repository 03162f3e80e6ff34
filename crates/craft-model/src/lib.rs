#![deny(warnings)]

//! Progress and quality models shared by every crafting action.
//!
//! Both models compute a delta from an action's nominal efficiency and the
//! buffs active on the state, and both apply their buff side effects to the
//! state as part of the call:
//! - [`apply_progress`] consumes Muscle Memory when it is active.
//! - [`apply_quality`] consumes Great Strides when it is active and grows
//!   Inner Quiet by one stack while `0 < iq_stacks < 11`.
//!
//! Arithmetic is carried out in `f64`, left to right, with floors only at the
//! marked steps. Reordering the operations changes the truncated results.

use craft_core::{
    CraftState, MaterialCondition, CONTROL, CRAFTSMANSHIP, MAX_IQ_STACKS, MAX_PROGRESS,
    RECIPE_CONTROL, RECIPE_CRAFTSMANSHIP,
};

/// Base progress per 100 efficiency before buffs (`p3`, floored).
pub fn base_progress() -> f64 {
    let craftsmanship = f64::from(CRAFTSMANSHIP);
    let p1 = f64::from(CRAFTSMANSHIP * 21) / 100.0 + 2.0;
    let p2 = p1 * (craftsmanship + 10000.0) / f64::from(RECIPE_CRAFTSMANSHIP + 10000);
    let p3 = p2 * 80.0 / 100.0;
    p3.floor()
}

/// Base quality per 100 efficiency before buffs and condition (`q3`, unfloored).
///
/// Every Inner Quiet stack past the first adds 20% of Control.
pub fn base_quality(iq_stacks: i32) -> f64 {
    let control = f64::from(CONTROL);
    let bonus_stacks = if iq_stacks > 0 { iq_stacks - 1 } else { 0 };
    let f_iq = control + control * (f64::from(bonus_stacks * 20) / 100.0);
    let q1 = f_iq * 35.0 / 100.0 + 35.0;
    let q2 = q1 * (f_iq + 10000.0) / f64::from(RECIPE_CONTROL + 10000);
    q2 * 60.0 / 100.0
}

/// Progress buff modifier in percent. Consumes Muscle Memory.
fn progress_modifier(state: &mut CraftState) -> i32 {
    let mut modifier = 100;
    if state.muscle_memory > 0 {
        modifier += 100;
        state.muscle_memory = 0;
    }
    if state.veneration > 0 {
        modifier += 50;
    }
    modifier
}

fn efficiency_factor(efficiency: i32, modifier: i32) -> f64 {
    f64::from(efficiency) / 100.0 * f64::from(modifier) / 100.0
}

/// Progress gained by an action of the given efficiency.
///
/// Side effect: clears `muscle_memory` if it was active.
pub fn apply_progress(state: &mut CraftState, efficiency: i32) -> i32 {
    let modifier = progress_modifier(state);
    (base_progress() * efficiency_factor(efficiency, modifier)).floor() as i32
}

/// Progress formula used by Brand of the Elements.
///
/// While Name of the Elements is active the efficiency factor gains
/// `2 * ceil(1 - progress / MAX_PROGRESS)`; otherwise this is identical to
/// [`apply_progress`], including the Muscle Memory side effect.
pub fn apply_scaled_progress(state: &mut CraftState, efficiency: i32) -> i32 {
    let modifier = progress_modifier(state);
    let mut factor = efficiency_factor(efficiency, modifier);
    if state.name_elements > 0 {
        let remaining = 1.0 - f64::from(state.progress) / f64::from(MAX_PROGRESS);
        factor += 2.0 * remaining.ceil();
    }
    (base_progress() * factor).floor() as i32
}

/// Quality gained by an action of the given efficiency.
///
/// Side effects: clears `great_strides` if it was active, and adds one Inner
/// Quiet stack when `0 < iq_stacks < 11`. The stack count used for the
/// delta is the one before the increment.
pub fn apply_quality(state: &mut CraftState, efficiency: i32) -> i32 {
    let q3 = base_quality(state.iq_stacks);
    let mut modifier = 100;
    if state.great_strides > 0 {
        modifier += 100;
        state.great_strides = 0;
    }
    if state.innovation > 0 {
        modifier += 50;
    }
    if state.iq_stacks > 0 && state.iq_stacks < MAX_IQ_STACKS {
        state.iq_stacks += 1;
    }
    let condition = match state.material_condition {
        MaterialCondition::Good => 150.0,
        _ => 100.0,
    };
    let conditioned = (q3 * condition / 100.0).floor();
    (conditioned * efficiency_factor(efficiency, modifier)).floor() as i32
}
