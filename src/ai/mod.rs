//! 电脑一方的猜数策略与可替换的随机源。

pub mod random;
pub mod strategy;

pub use random::{RandomSource, RngSource, SequenceSource};
pub use strategy::{computer_guess_secret, pick_computer_target, GuessOutcome};
