//! 游戏核心逻辑模块（状态机、表单校验、排序等）。

pub mod collation;
pub mod config;
pub mod controller;
pub mod copy;
pub mod form;
pub mod rules;
pub mod state;

pub use collation::{
    group_thousands,
    Collator,
    EnglishListFormatter,
    ListFormatter,
    NaturalCollator,
};
pub use config::GameConfig;
pub use controller::GameController;
pub use copy::Prompt;
pub use form::{coerce_input, FieldRules, FormField, FormState, FormValues, ValidationError};
pub use rules::{RuleEngine, RuleError, RuleResolution, Submission};
pub use state::{GameEvent, GamePhase, GameState, GameView, IntegrityError};
