use serde::{Deserialize, Serialize};

use super::rules::RuleError;

const DEFAULT_SECRET_MIN: u32 = 1;
const DEFAULT_SECRET_MAX: u32 = 999;
const DEFAULT_TARGET_MIN: u32 = 1;
const DEFAULT_TARGET_MAX: u32 = 10;

/// 一局游戏的数值范围与随机种子。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    #[serde(default = "default_secret_min")]
    pub secret_min: u32,
    #[serde(default = "default_secret_max")]
    pub secret_max: u32,
    #[serde(default = "default_target_min")]
    pub target_min: u32,
    #[serde(default = "default_target_max")]
    pub target_max: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_secret_min() -> u32 {
    DEFAULT_SECRET_MIN
}

fn default_secret_max() -> u32 {
    DEFAULT_SECRET_MAX
}

fn default_target_min() -> u32 {
    DEFAULT_TARGET_MIN
}

fn default_target_max() -> u32 {
    DEFAULT_TARGET_MAX
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|error| RuleError::InvalidConfig {
                reason: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        check_range("secret", self.secret_min, self.secret_max)?;
        check_range("target", self.target_min, self.target_max)
    }

    pub fn secret_range_contains(&self, value: i64) -> bool {
        value >= self.secret_min as i64 && value <= self.secret_max as i64
    }

    pub fn target_range_contains(&self, value: i64) -> bool {
        value >= self.target_min as i64 && value <= self.target_max as i64
    }
}

fn check_range(name: &str, min: u32, max: u32) -> Result<(), RuleError> {
    if min < 1 {
        return Err(RuleError::InvalidConfig {
            reason: format!("{name}_min must be at least 1"),
        });
    }
    if min > max {
        return Err(RuleError::InvalidConfig {
            reason: format!("{name}_min ({min}) exceeds {name}_max ({max})"),
        });
    }
    Ok(())
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            secret_min: DEFAULT_SECRET_MIN,
            secret_max: DEFAULT_SECRET_MAX,
            target_min: DEFAULT_TARGET_MIN,
            target_max: DEFAULT_TARGET_MAX,
            seed: None,
        }
    }
}
