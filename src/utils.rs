use log::{Level, LevelFilter};

#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
pub fn set_panic_hook() {}

/// 安装浏览器控制台日志，默认只输出警告。
pub fn install_logger() {
    if console_log::init_with_level(Level::Trace).is_ok() {
        log::set_max_level(LevelFilter::Warn);
    }
}

/// 解析日志级别，支持 `off` 以及 `error` 到 `trace`。
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse::<LevelFilter>().ok()
}
