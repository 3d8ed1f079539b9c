//! 流式响应解析器
//!
//! 两种接口形态各一个解析器，输出统一的 `TranslationEvent`。
//! 解析器不接触网络，可以用字面字符串直接测试。

pub mod legacy_complete;
pub mod messages_sse;

pub use legacy_complete::LegacyCompleteParser;
pub use messages_sse::{LineState, MessagesSseParser};

use crate::config::ApiVariant;
use crate::stream::events::TranslationEvent;

/// 按接口形态封装的解析器
#[derive(Debug)]
pub enum ResponseParser {
    LegacyComplete(LegacyCompleteParser),
    Messages(MessagesSseParser),
}

impl ResponseParser {
    pub fn for_variant(variant: ApiVariant) -> Self {
        match variant {
            ApiVariant::LegacyComplete => {
                ResponseParser::LegacyComplete(LegacyCompleteParser::new())
            }
            ApiVariant::Messages => ResponseParser::Messages(MessagesSseParser::new()),
        }
    }

    pub fn process_chunk(&mut self, chunk: &str) -> Vec<TranslationEvent> {
        match self {
            ResponseParser::LegacyComplete(parser) => parser.process_chunk(chunk),
            ResponseParser::Messages(parser) => parser.process_chunk(chunk),
        }
    }

    /// 流结束时的收尾事件（形态相关）
    pub fn finish(&mut self) -> Option<TranslationEvent> {
        match self {
            ResponseParser::LegacyComplete(parser) => parser.finish(),
            ResponseParser::Messages(parser) => parser.finish(),
        }
    }
}
