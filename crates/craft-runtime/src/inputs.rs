//! Per-turn external inputs: material condition and success roll.
//!
//! The engine never rolls dice; these sources produce the values the
//! sequencer stamps onto the state before each action.

use craft_core::MaterialCondition;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the condition and success roll for each turn.
pub trait TurnInputs {
    fn next_turn(&mut self, turn: u32) -> (MaterialCondition, i32);
}

/// Map a roll in 0..=99 to a condition.
///
/// Good 12%, Centered 15%, Pliant 12%, Sturdy 15%, Normal otherwise.
pub fn condition_from_roll(roll: u32) -> MaterialCondition {
    match roll {
        0..=11 => MaterialCondition::Good,
        12..=26 => MaterialCondition::Centered,
        27..=38 => MaterialCondition::Pliant,
        39..=53 => MaterialCondition::Sturdy,
        _ => MaterialCondition::Normal,
    }
}

/// Condition sequence for `len` turns; the first turn is always Normal.
pub fn generate_material_conditions<R: Rng>(rng: &mut R, len: usize) -> Vec<MaterialCondition> {
    (0..len)
        .map(|turn| {
            if turn == 0 {
                MaterialCondition::Normal
            } else {
                condition_from_roll(rng.gen_range(0..100))
            }
        })
        .collect()
}

/// Success rolls in [0, 99] for `len` turns.
pub fn generate_success_values<R: Rng>(rng: &mut R, len: usize) -> Vec<i32> {
    (0..len).map(|_| rng.gen_range(0..100)).collect()
}

/// Rolls conditions and success values on demand from a seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct SeededInputs {
    rng: ChaCha8Rng,
}

impl SeededInputs {
    /// Start a fresh stream; the same seed replays the same turns.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl TurnInputs for SeededInputs {
    fn next_turn(&mut self, turn: u32) -> (MaterialCondition, i32) {
        let condition = if turn == 0 {
            MaterialCondition::Normal
        } else {
            condition_from_roll(self.rng.gen_range(0..100))
        };
        (condition, self.rng.gen_range(0..100))
    }
}

/// Fixed sequences, indexed by turn. Turns past the end read Normal and 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInputs {
    conditions: Vec<MaterialCondition>,
    success_values: Vec<i32>,
}

impl ScriptedInputs {
    /// Conditions and rolls indexed by turn; the vectors may differ in length.
    pub fn new(conditions: Vec<MaterialCondition>, success_values: Vec<i32>) -> Self {
        Self {
            conditions,
            success_values,
        }
    }

    /// Pre-generate `len` turns from a seed.
    pub fn generated(seed: u64, len: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let conditions = generate_material_conditions(&mut rng, len);
        let success_values = generate_success_values(&mut rng, len);
        Self::new(conditions, success_values)
    }
}

impl TurnInputs for ScriptedInputs {
    fn next_turn(&mut self, turn: u32) -> (MaterialCondition, i32) {
        let i = turn as usize;
        (
            self.conditions.get(i).copied().unwrap_or_default(),
            self.success_values.get(i).copied().unwrap_or(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roll_table_boundaries() {
        let cases = [
            (0, MaterialCondition::Good),
            (11, MaterialCondition::Good),
            (12, MaterialCondition::Centered),
            (26, MaterialCondition::Centered),
            (27, MaterialCondition::Pliant),
            (38, MaterialCondition::Pliant),
            (39, MaterialCondition::Sturdy),
            (53, MaterialCondition::Sturdy),
            (54, MaterialCondition::Normal),
            (99, MaterialCondition::Normal),
        ];
        for (roll, expected) in cases {
            assert_eq!(condition_from_roll(roll), expected, "roll {roll}");
        }
    }

    #[test]
    fn generated_distribution_is_close_to_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 20_000;
        let conditions = generate_material_conditions(&mut rng, n);
        assert_eq!(conditions[0], MaterialCondition::Normal);
        let share = |c: MaterialCondition| {
            conditions.iter().filter(|x| **x == c).count() as f64 / n as f64
        };
        assert!((share(MaterialCondition::Good) - 0.12).abs() < 0.02);
        assert!((share(MaterialCondition::Centered) - 0.15).abs() < 0.02);
        assert!((share(MaterialCondition::Pliant) - 0.12).abs() < 0.02);
        assert!((share(MaterialCondition::Sturdy) - 0.15).abs() < 0.02);
        assert!((share(MaterialCondition::Normal) - 0.46).abs() < 0.02);
    }

    #[test]
    fn scripted_inputs_pad_with_defaults() {
        let mut inputs = ScriptedInputs::new(
            vec![MaterialCondition::Normal, MaterialCondition::Good],
            vec![5],
        );
        assert_eq!(inputs.next_turn(1), (MaterialCondition::Good, 0));
        assert_eq!(inputs.next_turn(0), (MaterialCondition::Normal, 5));
        assert_eq!(inputs.next_turn(9), (MaterialCondition::Normal, 0));
    }

    #[test]
    fn generated_scripts_are_reproducible() {
        let mut a = ScriptedInputs::generated(9, 30);
        let mut b = ScriptedInputs::generated(9, 30);
        for turn in 0..30 {
            assert_eq!(a.next_turn(turn), b.next_turn(turn));
        }
    }

    proptest! {
        #[test]
        fn seeded_inputs_stay_in_range(seed in any::<u64>(), turns in 1u32..60) {
            let mut inputs = SeededInputs::new(seed);
            for turn in 0..turns {
                let (condition, roll) = inputs.next_turn(turn);
                prop_assert!((0..=99).contains(&roll));
                if turn == 0 {
                    prop_assert_eq!(condition, MaterialCondition::Normal);
                }
            }
        }
    }
}
