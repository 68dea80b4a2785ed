//! 表单状态：两个数字输入框的值、逐字段的校验错误、待聚焦字段。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::IntErrorKind;
use std::str::FromStr;
use thiserror::Error;

use super::collation::group_thousands;
use super::config::GameConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    SecretNumber,
    Guess,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            FormField::SecretNumber => "secretNumber",
            FormField::Guess => "guess",
        }
    }
}

impl FromStr for FormField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secretNumber" | "secret_number" => Ok(FormField::SecretNumber),
            "guess" => Ok(FormField::Guess),
            _ => Err(()),
        }
    }
}

/// 提交时两个字段的数值，默认都是 0。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    #[serde(default)]
    pub secret_number: i64,
    #[serde(default)]
    pub guess: i64,
}

impl FormValues {
    pub fn secret(secret_number: i64) -> Self {
        Self {
            secret_number,
            guess: 0,
        }
    }

    pub fn guess(guess: i64) -> Self {
        Self {
            secret_number: 0,
            guess,
        }
    }
}

fn floor_label(min: &u32) -> String {
    group_thousands(i64::from(*min) - 1)
}

fn ceiling_label(max: &u32) -> String {
    group_thousands(i64::from(*max) + 1)
}

/// 校验失败时显示给玩家的文字。
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ValidationError {
    #[error("Required")]
    Required,
    #[error("Must be greater than {}", floor_label(.min))]
    BelowMinimum { min: u32 },
    #[error("Must be less than {}", ceiling_label(.max))]
    AboveMaximum { max: u32 },
    #[error("You have already tried that number.")]
    AlreadyTried,
}

/// 把输入框里的原始文本转成数值。
///
/// 空白视为未填写；无法解析的内容按 0 处理，随后由最小值规则拦下。
/// 超出 `i64` 的数字饱和到两端，仍由上下限规则给出提示。
pub fn coerce_input(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(error) => match error.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => {
                log::warn!("non-numeric input `{trimmed}` coerced to 0");
                Some(0)
            }
        },
    }
}

/// 单个输入框的规则，同时作为前端渲染时的字段描述。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldRules {
    pub name: FormField,
    pub label: String,
    pub required: bool,
    pub min: u32,
    pub max: u32,
    pub auto_focus: bool,
}

impl FieldRules {
    pub fn for_field(field: FormField, config: &GameConfig) -> Self {
        match field {
            FormField::SecretNumber => Self {
                name: field,
                label: "Secret Number".into(),
                required: true,
                min: config.secret_min,
                max: config.secret_max,
                auto_focus: false,
            },
            FormField::Guess => Self {
                name: field,
                label: "Secret Number".into(),
                required: true,
                min: config.target_min,
                max: config.target_max,
                auto_focus: true,
            },
        }
    }

    /// 依次检查必填、上限、下限，最后检查是否重复。
    pub fn check(&self, value: Option<i64>, tried: &[String]) -> Result<i64, ValidationError> {
        let value = match value {
            Some(value) => value,
            None if self.required => return Err(ValidationError::Required),
            None => return Ok(0),
        };
        if value > i64::from(self.max) {
            return Err(ValidationError::AboveMaximum { max: self.max });
        }
        if value < i64::from(self.min) {
            return Err(ValidationError::BelowMinimum { min: self.min });
        }
        if self.name == FormField::Guess {
            let text = value.to_string();
            if tried.iter().any(|previous| *previous == text) {
                return Err(ValidationError::AlreadyTried);
            }
        }
        Ok(value)
    }
}

/// 表单状态持有者。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    secret_number: Option<i64>,
    guess: Option<i64>,
    errors: BTreeMap<FormField, ValidationError>,
    focus: Option<FormField>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            secret_number: Some(0),
            guess: Some(0),
            errors: BTreeMap::new(),
            focus: None,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, field: FormField, raw: &str) {
        self.set_value(field, coerce_input(raw));
    }

    pub fn set_value(&mut self, field: FormField, value: Option<i64>) {
        match field {
            FormField::SecretNumber => self.secret_number = value,
            FormField::Guess => self.guess = value,
        }
        self.errors.remove(&field);
    }

    pub fn load(&mut self, values: FormValues) {
        self.set_value(FormField::SecretNumber, Some(values.secret_number));
        self.set_value(FormField::Guess, Some(values.guess));
    }

    pub fn value(&self, field: FormField) -> Option<i64> {
        match field {
            FormField::SecretNumber => self.secret_number,
            FormField::Guess => self.guess,
        }
    }

    /// 提交给状态机的值，未填写的字段按 0。
    pub fn values(&self) -> FormValues {
        FormValues {
            secret_number: self.secret_number.unwrap_or(0),
            guess: self.guess.unwrap_or(0),
        }
    }

    pub fn validate(
        &mut self,
        rules: &FieldRules,
        tried: &[String],
    ) -> Result<i64, ValidationError> {
        match rules.check(self.value(rules.name), tried) {
            Ok(value) => {
                self.errors.remove(&rules.name);
                Ok(value)
            }
            Err(error) => {
                log::warn!("{} rejected: {error}", rules.name.name());
                self.errors.insert(rules.name, error.clone());
                Err(error)
            }
        }
    }

    pub fn error(&self, field: FormField) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    /// 渲染用：字段 → 错误文字。
    pub fn error_messages(&self) -> BTreeMap<FormField, String> {
        self.errors
            .iter()
            .map(|(field, error)| (*field, error.to_string()))
            .collect()
    }

    /// 两个字段回到 0，错误清空。待聚焦字段保留。
    pub fn reset(&mut self) {
        self.secret_number = Some(0);
        self.guess = Some(0);
        self.errors.clear();
    }

    pub fn set_focus(&mut self, field: FormField) {
        self.focus = Some(field);
    }

    pub fn take_focus(&mut self) -> Option<FormField> {
        self.focus.take()
    }
}
