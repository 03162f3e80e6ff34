#![deny(warnings)]

//! Attempt runner for the crafting engine.
//!
//! Feeds per-turn inputs into a [`Sequencer`], asks a policy for each move,
//! and classifies how every attempt ended. [`run_batch`] drives many seeded
//! attempts and aggregates the results.

mod inputs;
mod sequencer;

pub use inputs::{
    condition_from_roll, generate_material_conditions, generate_success_values, ScriptedInputs,
    SeededInputs, TurnInputs,
};
pub use sequencer::{CraftStatus, Sequencer, TurnRecord, MANIPULATION_RESTORE};

use craft_actions::Action;
use craft_ai::{ActionPolicy, RandomPolicy};
use craft_core::{validate_state, CraftState, ValidationError, MAX_CP, MAX_DURABILITY};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Run parameters. Missing fields in a config file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub rng_seed: u64,
    pub attempts: u32,
    /// Turns after which an unfinished attempt is cut off.
    pub max_turns: u32,
    pub starting_durability: i32,
    pub starting_cp: i32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            attempts: 100,
            max_turns: 40,
            starting_durability: MAX_DURABILITY,
            starting_cp: MAX_CP,
        }
    }
}

impl RunConfig {
    /// Check attempt counts and starting resources.
    ///
    /// Example:
    /// ```
    /// use craft_runtime::{ConfigError, RunConfig};
    /// let config = RunConfig { attempts: 0, ..RunConfig::default() };
    /// assert_eq!(config.validate(), Err(ConfigError::ZeroAttempts));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroMaxTurns);
        }
        if !(1..=MAX_DURABILITY).contains(&self.starting_durability) {
            return Err(ConfigError::DurabilityOutOfRange(self.starting_durability));
        }
        if !(0..=MAX_CP).contains(&self.starting_cp) {
            return Err(ConfigError::CpOutOfRange(self.starting_cp));
        }
        Ok(())
    }

    /// Validated starting state for one attempt.
    pub fn initial_state(&self) -> Result<CraftState, RunError> {
        self.validate()?;
        let state = CraftState::with_resources(self.starting_durability, self.starting_cp);
        validate_state(&state)?;
        Ok(state)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("attempts must be at least 1")]
    ZeroAttempts,
    #[error("max_turns must be at least 1")]
    ZeroMaxTurns,
    #[error("starting durability {0} out of range [1, 50]")]
    DurabilityOutOfRange(i32),
    #[error("starting cp {0} out of range [0, 572]")]
    CpOutOfRange(i32),
}

#[derive(Debug, Error, PartialEq)]
pub enum RunError {
    #[error("invalid run config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid craft state: {0}")]
    Validation(#[from] ValidationError),
}

/// How an attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptResult {
    Completed,
    Broken,
    OutOfCp,
    /// Still in progress when `max_turns` ran out.
    TurnLimit,
}

impl From<CraftStatus> for AttemptResult {
    fn from(status: CraftStatus) -> Self {
        match status {
            CraftStatus::Completed => AttemptResult::Completed,
            CraftStatus::Broken => AttemptResult::Broken,
            CraftStatus::OutOfCp => AttemptResult::OutOfCp,
            CraftStatus::InProgress => AttemptResult::TurnLimit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptReport {
    pub turns: u32,
    pub actions: Vec<Action>,
    pub final_state: CraftState,
    pub result: AttemptResult,
}

/// Play one attempt until it finishes or hits the turn limit.
pub fn run_attempt<P, I>(
    policy: &mut P,
    inputs: &mut I,
    config: &RunConfig,
) -> Result<AttemptReport, RunError>
where
    P: ActionPolicy + ?Sized,
    I: TurnInputs + ?Sized,
{
    let mut seq = Sequencer::new(config.initial_state()?);
    let mut actions = Vec::new();

    while seq.turn() < config.max_turns && !seq.status().is_finished() {
        let (condition, success_val) = inputs.next_turn(seq.turn());
        seq.begin_turn(condition, success_val);
        let action = policy.choose(seq.state());
        seq.play(action);
        actions.push(action);
    }

    let result = AttemptResult::from(seq.status());
    let final_state = seq.into_state();
    debug!(
        policy = policy.name(),
        turns = final_state.step_number,
        ?result,
        progress = final_state.progress,
        quality = final_state.quality,
        "attempt finished"
    );
    Ok(AttemptReport {
        turns: final_state.step_number,
        actions,
        final_state,
        result,
    })
}

/// Aggregate over a batch of seeded random attempts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub rng_seed: u64,
    pub attempts: u32,
    pub completed: u32,
    pub broken: u32,
    pub out_of_cp: u32,
    pub turn_limit: u32,
    /// Highest quality among completed attempts.
    pub best_quality: Option<i32>,
    /// Index of the attempt that reached `best_quality`.
    pub best_attempt: Option<u32>,
    /// Mean final quality over every attempt.
    pub mean_quality: f64,
    pub mean_turns: f64,
}

/// Seed for the policy stream, decorrelated from the input stream that
/// shares the same attempt seed.
fn policy_seed(seed: u64) -> u64 {
    let mut h = seed ^ 0x9e3779b97f4a7c15;
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h
}

/// Run `config.attempts` attempts with [`RandomPolicy`] and [`SeededInputs`].
///
/// Attempt `i` uses seed `rng_seed + i`, so any single attempt can be
/// replayed on its own.
pub fn run_batch(config: &RunConfig) -> Result<BatchReport, RunError> {
    config.validate()?;
    info!(seed = config.rng_seed, attempts = config.attempts, "starting batch");

    let mut report = BatchReport {
        rng_seed: config.rng_seed,
        attempts: config.attempts,
        completed: 0,
        broken: 0,
        out_of_cp: 0,
        turn_limit: 0,
        best_quality: None,
        best_attempt: None,
        mean_quality: 0.0,
        mean_turns: 0.0,
    };
    let mut quality_sum = 0i64;
    let mut turn_sum = 0u64;

    for index in 0..config.attempts {
        let seed = config.rng_seed.wrapping_add(u64::from(index));
        let mut inputs = SeededInputs::new(seed);
        let mut policy = RandomPolicy::new(policy_seed(seed));
        let attempt = run_attempt(&mut policy, &mut inputs, config)?;

        let quality = attempt.final_state.quality;
        quality_sum += i64::from(quality);
        turn_sum += u64::from(attempt.turns);
        match attempt.result {
            AttemptResult::Completed => {
                report.completed += 1;
                if report.best_quality.map_or(true, |best| quality > best) {
                    report.best_quality = Some(quality);
                    report.best_attempt = Some(index);
                }
            }
            AttemptResult::Broken => report.broken += 1,
            AttemptResult::OutOfCp => report.out_of_cp += 1,
            AttemptResult::TurnLimit => report.turn_limit += 1,
        }
    }

    let n = f64::from(config.attempts);
    report.mean_quality = quality_sum as f64 / n;
    report.mean_turns = turn_sum as f64 / n;
    info!(
        completed = report.completed,
        broken = report.broken,
        out_of_cp = report.out_of_cp,
        turn_limit = report.turn_limit,
        best_quality = ?report.best_quality,
        mean_quality = report.mean_quality,
        "batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use craft_ai::ScriptedPolicy;
    use craft_core::MAX_PROGRESS;
    use proptest::prelude::*;

    fn scripted(actions: Vec<Action>, config: &RunConfig) -> AttemptReport {
        let mut policy = ScriptedPolicy::new(actions);
        let mut inputs = ScriptedInputs::default();
        run_attempt(&mut policy, &mut inputs, config).unwrap()
    }

    #[test]
    fn completion_wins_over_zero_durability() {
        let report = scripted(
            vec![
                Action::MuscleMemory,
                Action::RapidSynthesis,
                Action::RapidSynthesis,
                Action::RapidSynthesis,
                Action::RapidSynthesis,
            ],
            &RunConfig::default(),
        );
        assert_eq!(report.result, AttemptResult::Completed);
        assert_eq!(report.turns, 5);
        assert_eq!(report.final_state.progress, MAX_PROGRESS);
        assert_eq!(report.final_state.durability, 0);
        assert_eq!(report.final_state.cp, MAX_CP - 6);
        assert_eq!(report.actions.len(), 5);
    }

    #[test]
    fn durability_exhaustion_breaks() {
        let report = scripted(
            vec![Action::MuscleMemory, Action::Groundwork, Action::Groundwork],
            &RunConfig::default(),
        );
        assert_eq!(report.result, AttemptResult::Broken);
        assert_eq!(report.turns, 3);
        assert_eq!(report.final_state.progress, 1365 + 2730 + 1365);
        assert_eq!(report.final_state.durability, 0);
    }

    #[test]
    fn unfinished_attempt_hits_turn_limit() {
        let config = RunConfig {
            max_turns: 3,
            ..RunConfig::default()
        };
        let report = scripted(
            vec![Action::Reflect, Action::Observe, Action::Observe],
            &config,
        );
        assert_eq!(report.result, AttemptResult::TurnLimit);
        assert_eq!(report.turns, 3);
    }

    #[test]
    fn overdrawn_cp_ends_the_attempt() {
        let config = RunConfig {
            starting_cp: 10,
            ..RunConfig::default()
        };
        let report = scripted(
            vec![Action::MuscleMemory, Action::Manipulation, Action::BasicSynthesis],
            &config,
        );
        assert_eq!(report.result, AttemptResult::OutOfCp);
        assert_eq!(report.turns, 2);
        assert_eq!(report.final_state.cp, 10 - 6 - 96);
    }

    #[test]
    fn config_validation() {
        assert!(RunConfig::default().validate().is_ok());
        let bad = RunConfig {
            attempts: 0,
            ..RunConfig::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroAttempts));
        let bad = RunConfig {
            max_turns: 0,
            ..RunConfig::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroMaxTurns));
        let bad = RunConfig {
            starting_durability: 51,
            ..RunConfig::default()
        };
        assert_eq!(
            run_batch(&bad),
            Err(RunError::Config(ConfigError::DurabilityOutOfRange(51)))
        );
        let bad = RunConfig {
            starting_cp: -1,
            ..RunConfig::default()
        };
        assert!(bad.initial_state().is_err());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: RunConfig = serde_json::from_str(r#"{"rng_seed": 7}"#).unwrap();
        assert_eq!(config.rng_seed, 7);
        assert_eq!(config.attempts, 100);
        assert_eq!(config.starting_cp, MAX_CP);
    }

    #[test]
    fn batches_are_reproducible() {
        let config = RunConfig {
            attempts: 25,
            ..RunConfig::default()
        };
        let a = run_batch(&config).unwrap();
        let b = run_batch(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.completed + a.broken + a.out_of_cp + a.turn_limit, 25);
        assert_eq!(a.best_quality.is_some(), a.completed > 0);

        let json = serde_json::to_string(&a).unwrap();
        let back: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.completed, a.completed);
        assert_eq!(back.best_quality, a.best_quality);
    }

    #[test]
    fn single_attempt_replays_from_its_seed() {
        let config = RunConfig {
            rng_seed: 1000,
            attempts: 4,
            ..RunConfig::default()
        };
        let replay = |seed: u64| {
            let mut inputs = SeededInputs::new(seed);
            let mut policy = RandomPolicy::new(policy_seed(seed));
            run_attempt(&mut policy, &mut inputs, &config).unwrap()
        };
        assert_eq!(replay(1003), replay(1003));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn random_attempts_keep_state_invariants(seed in any::<u64>()) {
            let config = RunConfig::default();
            let mut seq = Sequencer::new(config.initial_state().unwrap());
            let mut inputs = SeededInputs::new(seed);
            let mut policy = RandomPolicy::new(policy_seed(seed));
            while seq.turn() < config.max_turns && !seq.status().is_finished() {
                let (condition, roll) = inputs.next_turn(seq.turn());
                seq.begin_turn(condition, roll);
                let action = policy.choose(seq.state());
                prop_assert!(action.is_usable(seq.state()));
                let record = seq.play(action);
                prop_assert!(validate_state(&record.state).is_ok());
            }
        }
    }
}
