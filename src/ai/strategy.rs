use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::game::{GameConfig, RuleError};

/// 电脑猜中玩家秘密数字的结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessOutcome {
    pub attempts: u32,
}

/// 电脑用拒绝采样去“猜”玩家的秘密数字。
///
/// 每次在 `[secret_min, secret_max]` 中抽一个候选；已抽过的候选直接丢弃、不计数，
/// 新候选记入列表并计数一次，抽中秘密数字即停止。列表以哨兵 `0` 开头。
/// 没有迭代上限，终止只依赖随机源最终给出秘密数字。
pub fn computer_guess_secret<R: RandomSource>(
    rng: &mut R,
    config: &GameConfig,
    secret: i64,
) -> Result<GuessOutcome, RuleError> {
    if !config.secret_range_contains(secret) {
        return Err(RuleError::SecretOutOfRange {
            value: secret,
            min: config.secret_min,
            max: config.secret_max,
        });
    }
    let secret = secret as u32;

    let mut previous: Vec<u32> = vec![0];
    let mut attempts = 0u32;
    loop {
        let candidate = rng.uniform(config.secret_min, config.secret_max);
        if previous.contains(&candidate) {
            continue;
        }
        previous.push(candidate);
        attempts += 1;
        if candidate == secret {
            break;
        }
    }

    log::debug!("computer found {secret} after {attempts} distinct guesses");
    Ok(GuessOutcome { attempts })
}

/// 电脑自己出的数字，玩家要来猜。
pub fn pick_computer_target<R: RandomSource>(rng: &mut R, config: &GameConfig) -> u32 {
    rng.uniform(config.target_min, config.target_max)
}
