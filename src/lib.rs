//! lingocast — Claude 翻译适配器
//!
//! 把 Bob 宿主的 `translate(query)` 契约适配到 Anthropic 补全接口，
//! 同时覆盖旧版 `/v1/complete` 与当前 `/v1/messages` 两种形态。
//!
//! # 架构设计
//!
//! ```text
//! TranslateQuery ──> [prompt] ──> [RequestBody] ──> [Transport] ──> 响应字节流
//!
//! 响应字节流 ──> [Parser] ──> TranslationEvent ──> [适配层] ──> onStream / onCompletion
//! ```
//!
//! 解析器只消费字面字符串，与传输层完全解耦；引擎产出统一的
//! `TranslationEvent` 序列（任意多个 `Partial`，至多一个终态），
//! 再由薄适配层映射回宿主的回调约定。
//!
//! # 使用示例
//!
//! ```ignore
//! use lingocast::{PluginConfig, Translator, TranslateQuery};
//!
//! let config = PluginConfig::new("claude-3-haiku-20240307", "sk-ant-xxx");
//! let translator = Translator::new(config);
//!
//! let query = TranslateQuery::new("你好", "zh-Hans", "en");
//! translator
//!     .translate(query, |partial| { /* onStream */ }, |done| { /* onCompletion */ })
//!     .await;
//! ```

pub mod config;
pub mod credential;
pub mod engine;
pub mod error;
pub mod host;
pub mod lang;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod stream;

pub use config::{ApiVariant, PluginConfig};
pub use engine::Translator;
pub use error::{ErrorKind, ErrorPayload, TranslateError};
pub use host::{CompletionPayload, StreamPayload, TranslateQuery, TranslationResult};
pub use stream::events::TranslationEvent;
