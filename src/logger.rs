//! 日志初始化与脱敏
//!
//! 日志里不能出现完整的 API Key；所有可能包含凭证的内容在写入前
//! 统一走 `sanitize_log_message`。

use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::EnvFilter;

static ANTHROPIC_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sk-ant-[A-Za-z0-9_\-]{8,}").expect("固定模式必然合法"));

static API_KEY_HEADER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(x-api-key\s*[:=]\s*)\S+").expect("固定模式必然合法"));

/// 遮蔽消息中的 API Key 痕迹
pub fn sanitize_log_message(message: &str) -> String {
    let masked = ANTHROPIC_KEY_PATTERN.replace_all(message, "sk-ant-***");
    API_KEY_HEADER_PATTERN
        .replace_all(&masked, "${1}***")
        .into_owned()
}

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 环境变量优先于传入的默认级别；重复初始化静默忽略，
/// 便于多个测试共用。
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
