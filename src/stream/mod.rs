//! 流式处理层
//!
//! 提供从响应字节流到宿主可见事件的完整链路：
//! - 事件类型定义 (events)
//! - 响应流解析 (parsers)
//! - 字节流到事件流的管道 (pipeline)
//!
//! # 架构设计
//!
//! ```text
//! 响应字节流 ──> [Parser] ──> TranslationEvent ──> 投递层
//!
//! 例如：
//! Messages SSE   ──> [MessagesSseParser]   ──> Partial* ──> Final
//! 旧版补全流     ──> [LegacyCompleteParser] ──> Partial*（流结束补 Final）
//! ```

pub mod events;
pub mod parsers;
pub mod pipeline;

pub use events::TranslationEvent;
pub use parsers::{LegacyCompleteParser, LineState, MessagesSseParser, ResponseParser};
pub use pipeline::event_stream;
