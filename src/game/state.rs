use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::collation::Collator;
use super::config::GameConfig;
use super::copy::Prompt;
use super::form::{FieldRules, FormField};

/// 游戏阶段，同一时刻只有一个生效。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GamePhase {
    AwaitingSecret,
    RevealedResult,
    AwaitingGuess,
    RetryGuess,
    GuessedCorrectly,
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::AwaitingSecret
    }
}

impl GamePhase {
    /// 渲染表单的三个阶段。
    pub const FORM_PHASES: [GamePhase; 3] = [
        GamePhase::AwaitingSecret,
        GamePhase::AwaitingGuess,
        GamePhase::RetryGuess,
    ];

    pub const GUESS_PHASES: [GamePhase; 2] = [GamePhase::AwaitingGuess, GamePhase::RetryGuess];

    /// 当前阶段显示的输入框。
    pub fn active_field(self) -> Option<FormField> {
        match self {
            GamePhase::AwaitingSecret => Some(FormField::SecretNumber),
            GamePhase::AwaitingGuess | GamePhase::RetryGuess => Some(FormField::Guess),
            GamePhase::RevealedResult | GamePhase::GuessedCorrectly => None,
        }
    }

    pub fn accepts_guess(self) -> bool {
        Self::GUESS_PHASES.contains(&self)
    }

    pub fn accepts_secret(self) -> bool {
        Self::FORM_PHASES.contains(&self)
    }
}

/// 状态迁移产生的事件。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    SecretGuessed { secret: u32, attempts: u32 },
    GuessRejected { guess: u32 },
    GuessAccepted { guess: u32 },
    TurnPassed,
    RoundStarted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    MissingResult,
    ZeroGuessCount,
    TargetOutOfRange { value: u32 },
    DuplicateTriedGuess { value: String },
    TargetAmongTried { value: String },
}

/// 一局游戏的全部可变数据，只由 `RuleEngine` 修改。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub phase: GamePhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess_count: Option<u32>,
    pub computer_target: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tried_guesses: Vec<String>,
}

impl GameState {
    pub fn new(computer_target: u32) -> Self {
        Self {
            phase: GamePhase::default(),
            secret_number: None,
            guess_count: None,
            computer_target,
            tried_guesses: Vec::new(),
        }
    }

    pub fn with_phase(mut self, phase: GamePhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn reveal_result(&mut self, secret: u32, attempts: u32) {
        self.secret_number = Some(secret);
        self.guess_count = Some(attempts);
        self.phase = GamePhase::RevealedResult;
    }

    pub fn clear_result(&mut self) {
        self.secret_number = None;
        self.guess_count = None;
    }

    pub fn has_tried(&self, guess: &str) -> bool {
        self.tried_guesses.iter().any(|tried| tried == guess)
    }

    /// 记录一次猜错，并保持列表有序。重复值不会再次加入。
    pub fn record_miss<C: Collator + ?Sized>(&mut self, guess: u32, collator: &C) {
        let value = guess.to_string();
        if !self.has_tried(&value) {
            self.tried_guesses.push(value);
            collator.sort(&mut self.tried_guesses);
        }
        self.phase = GamePhase::RetryGuess;
    }

    pub fn record_hit(&mut self) {
        self.tried_guesses.clear();
        self.phase = GamePhase::GuessedCorrectly;
    }

    /// 新的一轮：换一个电脑数字，清空上一轮的数据。
    pub fn start_round(&mut self, computer_target: u32) {
        self.clear_result();
        self.tried_guesses.clear();
        self.computer_target = computer_target;
        self.phase = GamePhase::AwaitingSecret;
    }

    pub fn integrity_check(&self, config: &GameConfig) -> Result<(), IntegrityError> {
        if !config.target_range_contains(self.computer_target as i64) {
            return Err(IntegrityError::TargetOutOfRange {
                value: self.computer_target,
            });
        }

        if self.phase == GamePhase::RevealedResult {
            match (self.secret_number, self.guess_count) {
                (Some(_), Some(0)) => return Err(IntegrityError::ZeroGuessCount),
                (Some(_), Some(_)) => {}
                _ => return Err(IntegrityError::MissingResult),
            }
        }

        let target = self.computer_target.to_string();
        let mut seen = HashSet::new();
        for guess in &self.tried_guesses {
            if !seen.insert(guess.as_str()) {
                return Err(IntegrityError::DuplicateTriedGuess {
                    value: guess.clone(),
                });
            }
            if *guess == target {
                return Err(IntegrityError::TargetAmongTried {
                    value: guess.clone(),
                });
            }
        }

        Ok(())
    }
}

/// 给前端渲染用的快照，不包含电脑的数字。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameView {
    pub phase: GamePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess_count: Option<u32>,
    pub tried_guesses: Vec<String>,
    pub tried_guesses_text: String,
    pub prompt: Prompt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldRules>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<FormField, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::collation::NaturalCollator;

    #[test]
    fn fresh_state_awaits_secret() {
        let state = GameState::new(4);
        assert_eq!(state.phase, GamePhase::AwaitingSecret);
        assert!(state.secret_number.is_none());
        assert!(state.guess_count.is_none());
        assert!(state.tried_guesses.is_empty());
        assert!(state.integrity_check(&GameConfig::default()).is_ok());
    }

    #[test]
    fn misses_stay_sorted_and_unique() {
        let mut state = GameState::new(2).with_phase(GamePhase::AwaitingGuess);
        for guess in [7, 1, 10, 4, 1] {
            state.record_miss(guess, &NaturalCollator);
        }
        assert_eq!(state.tried_guesses, vec!["1", "4", "7", "10"]);
        assert_eq!(state.phase, GamePhase::RetryGuess);
    }

    #[test]
    fn hit_clears_history() {
        let mut state = GameState::new(3).with_phase(GamePhase::RetryGuess);
        state.record_miss(9, &NaturalCollator);
        state.record_hit();
        assert!(state.tried_guesses.is_empty());
        assert_eq!(state.phase, GamePhase::GuessedCorrectly);
    }

    #[test]
    fn integrity_flags_broken_states() {
        let config = GameConfig::default();

        let state = GameState::new(11);
        assert_eq!(
            state.integrity_check(&config),
            Err(IntegrityError::TargetOutOfRange { value: 11 })
        );

        let mut state = GameState::new(5).with_phase(GamePhase::RevealedResult);
        assert_eq!(
            state.integrity_check(&config),
            Err(IntegrityError::MissingResult)
        );
        state.secret_number = Some(10);
        state.guess_count = Some(0);
        assert_eq!(
            state.integrity_check(&config),
            Err(IntegrityError::ZeroGuessCount)
        );

        let mut state = GameState::new(5).with_phase(GamePhase::RetryGuess);
        state.tried_guesses = vec!["3".into(), "3".into()];
        assert!(matches!(
            state.integrity_check(&config),
            Err(IntegrityError::DuplicateTriedGuess { .. })
        ));
        state.tried_guesses = vec!["5".into()];
        assert!(matches!(
            state.integrity_check(&config),
            Err(IntegrityError::TargetAmongTried { .. })
        ));
    }

    #[test]
    fn only_form_phases_expose_a_field() {
        assert_eq!(
            GamePhase::AwaitingSecret.active_field(),
            Some(FormField::SecretNumber)
        );
        assert_eq!(GamePhase::RetryGuess.active_field(), Some(FormField::Guess));
        assert_eq!(GamePhase::RevealedResult.active_field(), None);
        assert_eq!(GamePhase::GuessedCorrectly.active_field(), None);
        assert!(!GamePhase::AwaitingSecret.accepts_guess());
        assert!(GamePhase::RetryGuess.accepts_secret());
    }
}
