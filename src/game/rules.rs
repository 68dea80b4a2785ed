use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    collation::{Collator, NaturalCollator},
    config::GameConfig,
    form::{FormField, FormValues, ValidationError},
    state::{GameEvent, GamePhase, GameState, GameView, IntegrityError},
};
use crate::ai::{computer_guess_secret, pick_computer_target, RandomSource, RngSource};

/// 一次提交的含义。
///
/// 共用表单同时带着 `secretNumber` 与 `guess` 两个值：`guess > 0` 时视为猜电脑的数字，
/// 否则视为提交秘密数字。因此 `guess = 0` 永远不会被当作一次猜测。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value")]
pub enum Submission {
    Secret(i64),
    Guess(i64),
}

impl Submission {
    pub fn from_form(values: FormValues) -> Self {
        if values.guess > 0 {
            Submission::Guess(values.guess)
        } else {
            Submission::Secret(values.secret_number)
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    #[error("action not allowed in {actual:?}, expected one of {expected:?}")]
    InvalidPhase {
        expected: Vec<GamePhase>,
        actual: GamePhase,
    },
    #[error("secret number {value} is outside {min}..={max}")]
    SecretOutOfRange { value: i64, min: u32, max: u32 },
    #[error("guess {value} is outside {min}..={max}")]
    GuessOutOfRange { value: i64, min: u32, max: u32 },
    #[error("guess {value} was already tried")]
    DuplicateGuess { value: i64 },
    #[error("{}: {error}", .field.name())]
    Validation {
        field: FormField,
        error: ValidationError,
    },
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
    #[error("state integrity violated: {error:?}")]
    IntegrityViolation { error: IntegrityError },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleResolution {
    pub view: GameView,
    pub events: Vec<GameEvent>,
}

impl RuleResolution {
    pub fn new(view: GameView, events: Vec<GameEvent>) -> Self {
        Self { view, events }
    }
}

/// 所有状态迁移都在这里完成。
///
/// 每次迁移先在副本上执行并做完整性检查，成功后才写回，失败时状态不变。
pub struct RuleEngine<R = RngSource<SmallRng>, C = NaturalCollator> {
    config: GameConfig,
    rng: R,
    collator: C,
}

impl RuleEngine {
    pub fn new(config: GameConfig) -> Self {
        let rng = RngSource::from_optional_seed(config.seed);
        Self::with_parts(config, rng, NaturalCollator)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl<R: RandomSource, C: Collator> RuleEngine<R, C> {
    pub fn with_parts(config: GameConfig, rng: R, collator: C) -> Self {
        Self {
            config,
            rng,
            collator,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn collator(&self) -> &C {
        &self.collator
    }

    /// 开局：等待秘密数字，并抽好电脑的数字。
    pub fn new_game(&mut self) -> GameState {
        let target = pick_computer_target(&mut self.rng, &self.config);
        log::debug!("new game, computer target drawn");
        GameState::new(target)
    }

    fn ensure_phase(state: &GameState, allowed: &[GamePhase]) -> Result<(), RuleError> {
        if !allowed.contains(&state.phase) {
            return Err(RuleError::InvalidPhase {
                expected: allowed.to_vec(),
                actual: state.phase,
            });
        }
        Ok(())
    }

    fn ensure_integrity(&self, state: &GameState) -> Result<(), RuleError> {
        state
            .integrity_check(&self.config)
            .map_err(|error| RuleError::IntegrityViolation { error })
    }

    fn commit(&self, state: &mut GameState, next: GameState) -> Result<(), RuleError> {
        self.ensure_integrity(&next)?;
        log::debug!("phase {:?} -> {:?}", state.phase, next.phase);
        *state = next;
        Ok(())
    }

    /// 按共用表单的分派规则处理一次提交。
    pub fn submit(
        &mut self,
        state: &mut GameState,
        values: FormValues,
    ) -> Result<Vec<GameEvent>, RuleError> {
        self.apply(state, Submission::from_form(values))
    }

    pub fn apply(
        &mut self,
        state: &mut GameState,
        submission: Submission,
    ) -> Result<Vec<GameEvent>, RuleError> {
        match submission {
            Submission::Secret(secret) => self.submit_secret(state, secret),
            Submission::Guess(guess) => self.submit_guess(state, guess),
        }
    }

    pub fn submit_secret(
        &mut self,
        state: &mut GameState,
        secret: i64,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_phase(state, &GamePhase::FORM_PHASES)?;
        let outcome = computer_guess_secret(&mut self.rng, &self.config, secret)?;
        let secret = secret as u32;

        let mut next = state.clone();
        next.reveal_result(secret, outcome.attempts);
        self.commit(state, next)?;

        log::info!("computer guessed {secret} in {} attempts", outcome.attempts);
        Ok(vec![GameEvent::SecretGuessed {
            secret,
            attempts: outcome.attempts,
        }])
    }

    pub fn submit_guess(
        &mut self,
        state: &mut GameState,
        guess: i64,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_phase(state, &GamePhase::GUESS_PHASES)?;
        if !self.config.target_range_contains(guess) {
            return Err(RuleError::GuessOutOfRange {
                value: guess,
                min: self.config.target_min,
                max: self.config.target_max,
            });
        }
        if state.has_tried(&guess.to_string()) {
            return Err(RuleError::DuplicateGuess { value: guess });
        }
        let guess = guess as u32;

        let mut next = state.clone();
        let event = if guess == state.computer_target {
            next.record_hit();
            log::info!("player found the computer's number");
            GameEvent::GuessAccepted { guess }
        } else {
            next.record_miss(guess, &self.collator);
            GameEvent::GuessRejected { guess }
        };
        self.commit(state, next)?;
        Ok(vec![event])
    }

    /// "NEXT"：结果页进入玩家猜数阶段。
    pub fn click_next(&mut self, state: &mut GameState) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_phase(state, &[GamePhase::RevealedResult])?;
        let mut next = state.clone();
        next.clear_result();
        next.phase = GamePhase::AwaitingGuess;
        self.commit(state, next)?;
        Ok(vec![GameEvent::TurnPassed])
    }

    /// "Play Again"：重新抽电脑的数字，回到开局。
    pub fn play_again(&mut self, state: &mut GameState) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_phase(state, &[GamePhase::GuessedCorrectly])?;
        let target = pick_computer_target(&mut self.rng, &self.config);
        let mut next = state.clone();
        next.start_round(target);
        self.commit(state, next)?;
        Ok(vec![GameEvent::RoundStarted])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::SequenceSource;

    fn engine_with(draws: Vec<u32>) -> RuleEngine<SequenceSource> {
        RuleEngine::with_parts(
            GameConfig::default(),
            SequenceSource::new(draws),
            NaturalCollator,
        )
    }

    fn guessing_state(target: u32) -> GameState {
        GameState::new(target).with_phase(GamePhase::AwaitingGuess)
    }

    #[test]
    fn dispatch_uses_guess_above_zero() {
        assert_eq!(
            Submission::from_form(FormValues {
                secret_number: 234,
                guess: 0
            }),
            Submission::Secret(234)
        );
        assert_eq!(
            Submission::from_form(FormValues {
                secret_number: 234,
                guess: 3
            }),
            Submission::Guess(3)
        );
        assert_eq!(
            Submission::from_form(FormValues {
                secret_number: 0,
                guess: -2
            }),
            Submission::Secret(0)
        );
    }

    #[test]
    fn secret_submission_reveals_result() {
        let mut engine = engine_with(vec![100, 234]);
        let mut state = GameState::new(5);
        let events = engine
            .submit(&mut state, FormValues::secret(234))
            .expect("secret should be accepted");

        assert_eq!(state.phase, GamePhase::RevealedResult);
        assert_eq!(state.secret_number, Some(234));
        assert_eq!(state.guess_count, Some(2));
        assert_eq!(
            events,
            vec![GameEvent::SecretGuessed {
                secret: 234,
                attempts: 2
            }]
        );
    }

    #[test]
    fn next_clears_result_and_awaits_guess() {
        let mut engine = engine_with(vec![234]);
        let mut state = GameState::new(5);
        engine
            .submit(&mut state, FormValues::secret(234))
            .expect("secret should be accepted");
        engine.click_next(&mut state).expect("next from result");

        assert_eq!(state.phase, GamePhase::AwaitingGuess);
        assert!(state.secret_number.is_none());
        assert!(state.guess_count.is_none());
    }

    #[test]
    fn wrong_guesses_accumulate_sorted() {
        let mut engine = engine_with(vec![1]);
        let mut state = guessing_state(2);
        for guess in [7, 1, 4] {
            let events = engine
                .submit(&mut state, FormValues::guess(guess))
                .expect("wrong guess is still a valid submission");
            assert_eq!(
                events,
                vec![GameEvent::GuessRejected {
                    guess: guess as u32
                }]
            );
            assert_eq!(state.phase, GamePhase::RetryGuess);
        }
        assert_eq!(state.tried_guesses, vec!["1", "4", "7"]);
    }

    #[test]
    fn correct_guess_clears_history() {
        let mut engine = engine_with(vec![1]);
        let mut state = guessing_state(6);
        engine
            .submit(&mut state, FormValues::guess(3))
            .expect("miss");
        let events = engine
            .submit(&mut state, FormValues::guess(6))
            .expect("hit");

        assert_eq!(events, vec![GameEvent::GuessAccepted { guess: 6 }]);
        assert_eq!(state.phase, GamePhase::GuessedCorrectly);
        assert!(state.tried_guesses.is_empty());
    }

    #[test]
    fn correct_first_guess_from_awaiting_guess() {
        let mut engine = engine_with(vec![1]);
        let mut state = guessing_state(9);
        engine
            .submit(&mut state, FormValues::guess(9))
            .expect("hit");
        assert_eq!(state.phase, GamePhase::GuessedCorrectly);
    }

    #[test]
    fn duplicate_guess_leaves_state_untouched() {
        let mut engine = engine_with(vec![1]);
        let mut state = guessing_state(6);
        engine
            .submit(&mut state, FormValues::guess(3))
            .expect("miss");
        let before = state.clone();
        let error = engine
            .submit(&mut state, FormValues::guess(3))
            .expect_err("duplicate guess");
        assert_eq!(error, RuleError::DuplicateGuess { value: 3 });
        assert_eq!(state, before);
    }

    #[test]
    fn out_of_range_guess_is_rejected() {
        let mut engine = engine_with(vec![1]);
        let mut state = guessing_state(6);
        let error = engine
            .submit(&mut state, FormValues::guess(11))
            .expect_err("guess above range");
        assert!(matches!(error, RuleError::GuessOutOfRange { value: 11, .. }));
        assert_eq!(state.phase, GamePhase::AwaitingGuess);
    }

    #[test]
    fn zero_guess_is_routed_as_a_secret_submission() {
        let mut engine = engine_with(vec![1]);

        // Both values at their defaults: the secret path sees 0 and refuses it.
        let mut state = guessing_state(6);
        let error = engine
            .submit(&mut state, FormValues::default())
            .expect_err("secret 0 is outside the sampling range");
        assert!(matches!(error, RuleError::SecretOutOfRange { value: 0, .. }));
        assert_eq!(state.phase, GamePhase::AwaitingGuess);

        // A leftover secret value with guess 0 reveals a result mid-guessing.
        let mut engine = engine_with(vec![42]);
        let mut state = guessing_state(6);
        state.record_miss(3, &NaturalCollator);
        engine
            .submit(
                &mut state,
                FormValues {
                    secret_number: 42,
                    guess: 0,
                },
            )
            .expect("routed to the secret path");
        assert_eq!(state.phase, GamePhase::RevealedResult);
        assert_eq!(state.secret_number, Some(42));
        assert_eq!(state.tried_guesses, vec!["3"]);
    }

    #[test]
    fn guesses_are_refused_before_the_guessing_round() {
        let mut engine = engine_with(vec![1]);
        let mut state = GameState::new(6);
        let error = engine
            .submit(&mut state, FormValues::guess(6))
            .expect_err("no guessing while awaiting the secret");
        assert!(matches!(
            error,
            RuleError::InvalidPhase {
                actual: GamePhase::AwaitingSecret,
                ..
            }
        ));
        assert_eq!(state.phase, GamePhase::AwaitingSecret);
    }

    #[test]
    fn buttons_only_work_in_their_phase() {
        let mut engine = engine_with(vec![1]);
        let mut state = GameState::new(6);
        assert!(engine.click_next(&mut state).is_err());
        assert!(engine.play_again(&mut state).is_err());

        let mut state = GameState::new(6).with_phase(GamePhase::RevealedResult);
        state.reveal_result(12, 3);
        assert!(engine.submit(&mut state, FormValues::secret(5)).is_err());
        assert!(engine.submit(&mut state, FormValues::guess(5)).is_err());
        assert_eq!(state.phase, GamePhase::RevealedResult);
    }

    #[test]
    fn play_again_redraws_target_and_resets() {
        let mut engine = engine_with(vec![8]);
        let mut state = GameState::new(6).with_phase(GamePhase::GuessedCorrectly);
        state.secret_number = Some(3);
        state.guess_count = Some(4);

        let events = engine.play_again(&mut state).expect("play again");
        assert_eq!(events, vec![GameEvent::RoundStarted]);
        assert_eq!(state.phase, GamePhase::AwaitingSecret);
        assert_eq!(state.computer_target, 8);
        assert!(state.secret_number.is_none());
        assert!(state.guess_count.is_none());
        assert!(state.tried_guesses.is_empty());
    }

    #[test]
    fn full_round_trip_through_every_phase() {
        // draws: target, computer guesses (7 then 234), replay target
        let mut engine = engine_with(vec![4, 7, 234, 9]);
        let mut state = engine.new_game();
        assert_eq!(state.computer_target, 4);

        engine
            .submit(&mut state, FormValues::secret(234))
            .expect("secret");
        assert_eq!(state.guess_count, Some(2));
        engine.click_next(&mut state).expect("next");
        engine
            .submit(&mut state, FormValues::guess(2))
            .expect("miss");
        engine
            .submit(&mut state, FormValues::guess(4))
            .expect("hit");
        engine.play_again(&mut state).expect("again");

        assert_eq!(state.phase, GamePhase::AwaitingSecret);
        assert_eq!(state.computer_target, 9);
    }

    #[test]
    fn rule_errors_serialize_with_type_tag() {
        let json = serde_json::to_string(&RuleError::DuplicateGuess { value: 3 })
            .expect("serialize error");
        assert_eq!(json, r#"{"type":"DuplicateGuess","value":3}"#);
    }
}
