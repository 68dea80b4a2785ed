use rand::rngs::SmallRng;

use super::{
    collation::{Collator, EnglishListFormatter, ListFormatter, NaturalCollator},
    config::GameConfig,
    copy::Prompt,
    form::{FieldRules, FormField, FormState, FormValues},
    rules::{RuleEngine, RuleError, RuleResolution},
    state::{GameEvent, GamePhase, GameState, GameView},
};
use crate::ai::{RandomSource, RngSource};

/// 一局游戏的唯一持有者：状态、表单与规则引擎。
///
/// 所有操作都通过 `&mut self` 串行执行，同一会话不会出现交错的迁移。
pub struct GameController<R = RngSource<SmallRng>, C = NaturalCollator, L = EnglishListFormatter>
{
    engine: RuleEngine<R, C>,
    state: GameState,
    form: FormState,
    formatter: L,
}

impl GameController {
    pub fn new(config: GameConfig) -> Result<Self, RuleError> {
        let rng = RngSource::from_optional_seed(config.seed);
        Self::with_parts(config, rng, NaturalCollator, EnglishListFormatter)
    }
}

impl<R: RandomSource, C: Collator, L: ListFormatter> GameController<R, C, L> {
    pub fn with_parts(
        config: GameConfig,
        rng: R,
        collator: C,
        formatter: L,
    ) -> Result<Self, RuleError> {
        config.validate()?;
        let mut engine = RuleEngine::with_parts(config, rng, collator);
        let state = engine.new_game();
        Ok(Self {
            engine,
            state,
            form: FormState::new(),
            formatter,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn set_input(&mut self, field: FormField, raw: &str) {
        self.form.set_input(field, raw);
    }

    /// 先把两个字段的值写入表单，再提交。
    pub fn submit_values(&mut self, values: FormValues) -> Result<RuleResolution, RuleError> {
        self.form.load(values);
        self.submit()
    }

    /// 校验当前显示的字段；通过后按分派规则交给状态机，并重置表单。
    ///
    /// 校验失败时表单和状态都不变，错误文字留在表单里供渲染。
    pub fn submit(&mut self) -> Result<RuleResolution, RuleError> {
        let Some(field) = self.state.phase.active_field() else {
            self.form.reset();
            return Err(RuleError::InvalidPhase {
                expected: GamePhase::FORM_PHASES.to_vec(),
                actual: self.state.phase,
            });
        };
        let rules = FieldRules::for_field(field, self.engine.config());
        self.form
            .validate(&rules, &self.state.tried_guesses)
            .map_err(|error| RuleError::Validation { field, error })?;

        let result = self.engine.submit(&mut self.state, self.form.values());
        self.form.reset();
        let events = result?;

        if events
            .iter()
            .any(|event| matches!(event, GameEvent::GuessRejected { .. }))
        {
            self.form.set_focus(FormField::Guess);
        }
        Ok(self.resolution(events))
    }

    pub fn click_next(&mut self) -> Result<RuleResolution, RuleError> {
        let events = self.engine.click_next(&mut self.state)?;
        Ok(self.resolution(events))
    }

    pub fn play_again(&mut self) -> Result<RuleResolution, RuleError> {
        let events = self.engine.play_again(&mut self.state)?;
        self.form.reset();
        Ok(self.resolution(events))
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    pub fn request_focus(&mut self, field: FormField) {
        self.form.set_focus(field);
    }

    pub fn take_focus(&mut self) -> Option<FormField> {
        self.form.take_focus()
    }

    pub fn tried_guesses_text(&self) -> String {
        self.formatter.format(&self.state.tried_guesses)
    }

    pub fn view(&self) -> GameView {
        let config = self.engine.config();
        let tried_guesses_text = self.tried_guesses_text();
        GameView {
            phase: self.state.phase,
            secret_number: self.state.secret_number,
            guess_count: self.state.guess_count,
            tried_guesses: self.state.tried_guesses.clone(),
            prompt: Prompt::for_state(&self.state, config, &tried_guesses_text),
            tried_guesses_text,
            field: self
                .state
                .phase
                .active_field()
                .map(|field| FieldRules::for_field(field, config)),
            errors: self.form.error_messages(),
        }
    }

    fn resolution(&self, events: Vec<GameEvent>) -> RuleResolution {
        RuleResolution::new(self.view(), events)
    }
}
