pub mod ai;
pub mod game;
pub mod utils;

use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;

pub use ai::{
    computer_guess_secret, pick_computer_target, GuessOutcome, RandomSource, RngSource,
    SequenceSource,
};
pub use game::{
    Collator, EnglishListFormatter, FieldRules, FormField, FormState, FormValues, GameConfig,
    GameController, GameEvent, GamePhase, GameState, GameView, IntegrityError, ListFormatter,
    NaturalCollator, Prompt, RuleEngine, RuleError, RuleResolution, Submission, ValidationError,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
    utils::install_logger();
}

/// 调整控制台日志级别（`off`、`error`、`warn`、`info`、`debug`、`trace`）。
#[wasm_bindgen(js_name = "initLogging")]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter = utils::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("unknown log level `{level}`")))?;
    log::set_max_level(filter);
    Ok(())
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn make_resolution_json(resolution: RuleResolution) -> Result<String, JsValue> {
    serde_json::to_string(&resolution).map_err(serde_to_js_error)
}

fn parse_field(field: &str) -> Result<FormField, JsValue> {
    FormField::from_str(field)
        .map_err(|_| JsValue::from_str(&format!("unknown form field `{field}`")))
}

fn config_from_json(config_json: Option<String>) -> Result<GameConfig, JsValue> {
    match config_json {
        Some(json) => GameConfig::from_json(&json).map_err(to_js_error),
        None => Ok(GameConfig::default()),
    }
}

/// 浏览器里的一局游戏会话。
#[wasm_bindgen]
pub struct GameSession {
    controller: GameController,
}

#[wasm_bindgen]
impl GameSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<GameSession, JsValue> {
        let config = config_from_json(config_json)?;
        let controller = GameController::new(config).map_err(to_js_error)?;
        Ok(GameSession { controller })
    }

    pub fn view_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.view()).map_err(serde_to_js_error)
    }

    pub fn set_input(&mut self, field: &str, raw: &str) -> Result<(), JsValue> {
        let field = parse_field(field)?;
        self.controller.set_input(field, raw);
        Ok(())
    }

    pub fn submit_json(&mut self) -> Result<String, JsValue> {
        let resolution = self.controller.submit().map_err(to_js_error)?;
        make_resolution_json(resolution)
    }

    /// 一次性提交 `{"secretNumber": n, "guess": m}`。
    pub fn submit_values_json(&mut self, values_json: &str) -> Result<String, JsValue> {
        let values: FormValues = serde_json::from_str(values_json).map_err(serde_to_js_error)?;
        let resolution = self.controller.submit_values(values).map_err(to_js_error)?;
        make_resolution_json(resolution)
    }

    pub fn click_next_json(&mut self) -> Result<String, JsValue> {
        let resolution = self.controller.click_next().map_err(to_js_error)?;
        make_resolution_json(resolution)
    }

    pub fn play_again_json(&mut self) -> Result<String, JsValue> {
        let resolution = self.controller.play_again().map_err(to_js_error)?;
        make_resolution_json(resolution)
    }

    pub fn reset_form(&mut self) {
        self.controller.reset_form();
    }

    pub fn request_focus(&mut self, field: &str) -> Result<(), JsValue> {
        let field = parse_field(field)?;
        self.controller.request_focus(field);
        Ok(())
    }

    /// 取出待聚焦的字段名，取出后清空。
    pub fn take_focus(&mut self) -> Option<String> {
        self.controller
            .take_focus()
            .map(|field| field.name().to_string())
    }
}

#[wasm_bindgen(js_name = "naturalSort")]
pub fn natural_sort(items: JsValue) -> Result<JsValue, JsValue> {
    let mut items: Vec<String> = from_value(items).map_err(JsValue::from)?;
    NaturalCollator.sort(&mut items);
    to_value(&items).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "formatList")]
pub fn format_list(items: JsValue) -> Result<String, JsValue> {
    let items: Vec<String> = from_value(items).map_err(JsValue::from)?;
    Ok(EnglishListFormatter.format(&items))
}

/// 单独运行电脑猜数，返回 `{ attempts }`。
#[wasm_bindgen(js_name = "computerGuessSecret")]
pub fn computer_guess_secret_js(
    secret: i32,
    config_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let config = config_from_json(config_json)?;
    let mut rng = RngSource::from_optional_seed(config.seed);
    let outcome =
        computer_guess_secret(&mut rng, &config, i64::from(secret)).map_err(to_js_error)?;
    to_value(&outcome).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "pickComputerTarget")]
pub fn pick_computer_target_js(config_json: Option<String>) -> Result<u32, JsValue> {
    let config = config_from_json(config_json)?;
    let mut rng = RngSource::from_optional_seed(config.seed);
    Ok(pick_computer_target(&mut rng, &config))
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue, config_json: Option<String>) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    let config = config_from_json(config_json)?;
    state
        .integrity_check(&config)
        .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))?;
    Ok(())
}
