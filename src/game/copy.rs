use serde::{Deserialize, Serialize};

use super::collation::group_thousands;
use super::config::GameConfig;
use super::state::{GamePhase, GameState};

pub const WELCOME_MESSAGE: &str = "Let's play a game! First, I will try to guess your number.";
pub const RESULT_MESSAGE: [&str; 4] = ["Was your number", "?", "It took me", "guesses?"];
pub const SUBMIT_GUESS_MESSAGE: &str = "Now it's your turn! Try to guess my number.";
pub const TRY_AGAIN_MESSAGE: &str = "Sorry, that is incorrect, try again!";
pub const TRIED_NUMBERS_MESSAGE: &str = "Numbers you have tried:";
pub const CORRECT_GUESS_MESSAGE: &str = "That's correct!";
pub const PLAY_AGAIN_OFFER: &str = "Do you want to play again?";
pub const SUBMIT_BUTTON_TEXT: &str = "Submit";
pub const NEXT_BUTTON_TEXT: &str = "NEXT";
pub const PLAY_AGAIN_BUTTON_TEXT: &str = "Play Again";

/// 某一阶段显示的文字与唯一的按钮。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    pub lines: Vec<String>,
    pub button: String,
}

impl Prompt {
    pub fn for_state(state: &GameState, config: &GameConfig, tried_text: &str) -> Self {
        let mut lines = Vec::new();
        let button = match state.phase {
            GamePhase::AwaitingSecret => {
                lines.push(WELCOME_MESSAGE.to_string());
                lines.push(format!(
                    "Pick a number between {} - {}",
                    group_thousands(i64::from(config.secret_min)),
                    group_thousands(i64::from(config.secret_max) + 1),
                ));
                SUBMIT_BUTTON_TEXT
            }
            GamePhase::RevealedResult => {
                let secret = state.secret_number.unwrap_or_default();
                let attempts = state.guess_count.unwrap_or_default();
                lines.push(format!("{} {secret}{}", RESULT_MESSAGE[0], RESULT_MESSAGE[1]));
                lines.push(format!("{} {attempts} {}", RESULT_MESSAGE[2], RESULT_MESSAGE[3]));
                NEXT_BUTTON_TEXT
            }
            GamePhase::AwaitingGuess => {
                lines.push(SUBMIT_GUESS_MESSAGE.to_string());
                lines.push(guess_instructions(config));
                SUBMIT_BUTTON_TEXT
            }
            GamePhase::RetryGuess => {
                lines.push(TRY_AGAIN_MESSAGE.to_string());
                lines.push(format!("{TRIED_NUMBERS_MESSAGE} {tried_text}."));
                lines.push(guess_instructions(config));
                SUBMIT_BUTTON_TEXT
            }
            GamePhase::GuessedCorrectly => {
                lines.push(CORRECT_GUESS_MESSAGE.to_string());
                lines.push(PLAY_AGAIN_OFFER.to_string());
                PLAY_AGAIN_BUTTON_TEXT
            }
        };
        Self {
            lines,
            button: button.to_string(),
        }
    }
}

fn guess_instructions(config: &GameConfig) -> String {
    format!(
        "I am thinking of a number between {} - {}.",
        config.target_min, config.target_max
    )
}
