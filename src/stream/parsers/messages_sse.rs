//! Messages 接口 SSE 解析器
//!
//! 两态行状态机：等待 `event` 行 / 等待 `data` 行。解析器自带行缓冲，
//! 被 chunk 边界截断的行会在下一个 chunk 续上再处理。
//!
//! 文本效果只来自两类事件：`content_block_delta` 的 `text_delta`
//! 追加进累计译文并产出 `Partial`；`message_stop` 产出 `Final`，
//! 是这条协议唯一的成功终态来源。其余事件类型不影响译文。

use crate::error::TranslateError;
use crate::models::anthropic::{ApiErrorDetail, ContentDelta, StreamEventBody};
use crate::stream::events::TranslationEvent;
use tracing::{debug, warn};

/// 行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// 等待 `event` 行（`data` 行直接到来也接受）
    AwaitingEvent,
    /// 已读到 `event` 行，等待对应的 `data` 行
    AwaitingData,
}

/// Messages SSE 解析器
#[derive(Debug)]
pub struct MessagesSseParser {
    /// 行缓冲；末尾可能是半行
    line_buffer: String,
    /// 累计译文
    accumulated: String,
    state: LineState,
    /// 已产出终态，后续输入全部丢弃
    finished: bool,
}

impl Default for MessagesSseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagesSseParser {
    pub fn new() -> Self {
        Self {
            line_buffer: String::new(),
            accumulated: String::new(),
            state: LineState::AwaitingEvent,
            finished: false,
        }
    }

    /// 当前累计译文
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    /// 处理一个原始 chunk，返回由此产生的事件
    pub fn process_chunk(&mut self, chunk: &str) -> Vec<TranslationEvent> {
        let mut events = Vec::new();
        self.line_buffer.push_str(chunk);

        while let Some(pos) = self.line_buffer.find('\n') {
            let line: String = self.line_buffer.drain(..=pos).collect();
            self.handle_line(line.trim_end_matches(['\n', '\r']).trim(), &mut events);
            if self.finished {
                break;
            }
        }
        events
    }

    /// 流结束。成功终态只来自 `message_stop`，这里不补发
    pub fn finish(&mut self) -> Option<TranslationEvent> {
        None
    }

    fn handle_line(&mut self, line: &str, events: &mut Vec<TranslationEvent>) {
        if self.finished {
            return;
        }
        if line.is_empty() {
            // 事件块结束
            self.state = LineState::AwaitingEvent;
            return;
        }
        if let Some(name) = line.strip_prefix("event:") {
            // event 行只做状态切换，事件语义由 data 载荷的 type 决定
            debug!("[MessagesSseParser] 事件行: {}", name.trim());
            self.state = LineState::AwaitingData;
            return;
        }
        if let Some(data) = line.strip_prefix("data:") {
            self.state = LineState::AwaitingEvent;
            self.handle_data(data.trim(), events);
        }
        // 其余行（SSE 注释等）忽略
    }

    fn handle_data(&mut self, data: &str, events: &mut Vec<TranslationEvent>) {
        let body: StreamEventBody = match serde_json::from_str(data) {
            Ok(body) => body,
            Err(err) => {
                warn!("[MessagesSseParser] data 行解析失败: {} - {}", err, data);
                self.finished = true;
                events.push(TranslationEvent::Failure {
                    error: TranslateError::Parse(err.to_string()),
                });
                return;
            }
        };

        match body {
            StreamEventBody::ContentBlockDelta {
                delta: ContentDelta::TextDelta { text },
            } => {
                self.accumulated.push_str(&text);
                events.push(TranslationEvent::Partial {
                    text: self.accumulated.clone(),
                });
            }
            StreamEventBody::MessageStop => {
                self.finished = true;
                events.push(TranslationEvent::Final {
                    text: self.accumulated.clone(),
                });
            }
            StreamEventBody::Error { error } => {
                self.finished = true;
                events.push(TranslationEvent::Failure {
                    error: upstream_error(error),
                });
            }
            // message_start / content_block_start / content_block_stop /
            // message_delta / ping / 未知类型：对译文无效果
            _ => {}
        }
    }
}

fn upstream_error(detail: ApiErrorDetail) -> TranslateError {
    TranslateError::Upstream {
        message: detail
            .message
            .clone()
            .unwrap_or_else(|| "接口返回错误事件".to_string()),
        detail: serde_json::to_string(&detail).ok(),
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_delta_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,!?]{1,40}"
    }

    proptest! {
        /// 任意 delta 序列下，累计译文等于全部增量按到达顺序的拼接，
        /// 且每个 Partial 都是最终文本的前缀。
        #[test]
        fn prop_accumulated_equals_concatenation(
            deltas in prop::collection::vec(arb_delta_text(), 1..12)
        ) {
            let mut parser = MessagesSseParser::new();
            let mut partials = Vec::new();

            for delta in &deltas {
                let line = format!(
                    "data: {}\n",
                    serde_json::json!({
                        "type": "content_block_delta",
                        "index": 0,
                        "delta": {"type": "text_delta", "text": delta}
                    })
                );
                for event in parser.process_chunk(&line) {
                    if let TranslationEvent::Partial { text } = event {
                        partials.push(text);
                    }
                }
            }

            let expected: String = deltas.concat();
            prop_assert_eq!(partials.len(), deltas.len());
            prop_assert_eq!(parser.accumulated(), expected.as_str());
            for partial in &partials {
                prop_assert!(expected.starts_with(partial.as_str()));
            }

            let stop = parser.process_chunk("data: {\"type\":\"message_stop\"}\n");
            let is_final_with_expected = matches!(&stop[0], TranslationEvent::Final { text } if *text == expected);
            prop_assert!(is_final_with_expected);
        }

        /// 任意切分点都不影响解析结果
        #[test]
        fn prop_chunk_boundaries_are_irrelevant(
            text in arb_delta_text(),
            split in 0usize..60
        ) {
            let line = format!(
                "data: {}\n",
                serde_json::json!({
                    "type": "content_block_delta",
                    "index": 0,
                    "delta": {"type": "text_delta", "text": text}
                })
            );
            let split = split.min(line.len());
            let (head, tail) = line.split_at(split);

            let mut parser = MessagesSseParser::new();
            let mut partials = Vec::new();
            for chunk in [head, tail] {
                for event in parser.process_chunk(chunk) {
                    if let TranslationEvent::Partial { text } = event {
                        partials.push(text);
                    }
                }
            }
            prop_assert_eq!(partials.len(), 1);
            prop_assert_eq!(&partials[0], &text);
        }
    }
}
