//! 旧版 `/v1/complete` 流解析器
//!
//! 协议形态：一个 chunk 要么是 `event: completion` 行加 `data: <json>`
//! 行，要么是跨 chunk 续传的裸 JSON / 半截 JSON 片段。
//!
//! 快照语义：每个载荷携带完整的 `completion` 快照，整体**替换**累计
//! 译文，而不是追加。半截片段先留在续传缓冲里，等下一个 chunk 拼上
//! 再重试解析；这是尽力而为的恢复，片段被截断两次以上不保证收敛，
//! 永久畸形的流会静默停在缓冲里直到流结束。
//!
//! 成功终态由流结束（`finish`）给出，协议本身没有结束事件。

use crate::error::TranslateError;
use crate::models::anthropic::CompletionSnapshot;
use crate::stream::events::TranslationEvent;
use tracing::debug;

/// 旧版协议的结束哨兵
pub const DONE_SENTINEL: &str = "[DONE]";

const COMPLETION_EVENT: &str = "event: completion";
const PING_EVENT: &str = "event: ping";

/// 去掉可选的 `data:` 前缀
fn strip_data_prefix(payload: &str) -> &str {
    let trimmed = payload.trim_start();
    trimmed.strip_prefix("data:").unwrap_or(trimmed)
}

/// 旧版补全流解析器
#[derive(Debug, Default)]
pub struct LegacyCompleteParser {
    /// 累计译文快照
    accumulated: String,
    /// 跨 chunk 续传缓冲
    pending: String,
}

impl LegacyCompleteParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// 处理一个原始 chunk，返回由此产生的事件
    pub fn process_chunk(&mut self, chunk: &str) -> Vec<TranslationEvent> {
        let mut events = Vec::new();
        let mut lines = chunk.split('\n');
        let first = lines.next().unwrap_or("").trim();

        if first == COMPLETION_EVENT {
            // 标准形态：事件行之后紧跟 data 载荷行
            if let Some(payload) = lines.next() {
                let text = strip_data_prefix(payload).trim();
                if text != DONE_SENTINEL {
                    match serde_json::from_str::<CompletionSnapshot>(text) {
                        Ok(snapshot) => self.apply_snapshot(snapshot, text, &mut events),
                        Err(err) => {
                            // 载荷被 chunk 边界截断，留到下一个 chunk 续上
                            debug!("[LegacyCompleteParser] 载荷暂存续传缓冲: {}", err);
                            self.pending = payload.to_string();
                        }
                    }
                }
            }
        } else if first == PING_EVENT {
            // 心跳，忽略
        } else if !first.is_empty() {
            // 续传形态：拼到缓冲后重试整体解析
            self.pending.push_str(first);
            let joined = strip_data_prefix(&self.pending).trim().to_string();
            if joined != DONE_SENTINEL {
                if let Ok(snapshot) = serde_json::from_str::<CompletionSnapshot>(&joined) {
                    self.apply_snapshot(snapshot, &joined, &mut events);
                    self.pending.clear();
                }
                // 仍然解析失败就继续持有缓冲
            }
        }
        events
    }

    /// 流结束：当前累计快照即最终结果
    pub fn finish(&mut self) -> Option<TranslationEvent> {
        Some(TranslationEvent::Final {
            text: std::mem::take(&mut self.accumulated),
        })
    }

    fn apply_snapshot(
        &mut self,
        snapshot: CompletionSnapshot,
        raw: &str,
        events: &mut Vec<TranslationEvent>,
    ) {
        match snapshot.completion {
            None => events.push(TranslationEvent::Failure {
                error: TranslateError::MissingField {
                    body: Some(raw.to_string()),
                },
            }),
            // 空快照忽略
            Some(text) if text.is_empty() => {}
            Some(text) => {
                self.accumulated = text;
                events.push(TranslationEvent::Partial {
                    text: self.accumulated.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_snapshot_replaces_instead_of_appending() {
        let mut parser = LegacyCompleteParser::new();

        let events =
            parser.process_chunk("event: completion\ndata: {\"completion\":\" Bonjour\"}");
        assert!(matches!(&events[0], TranslationEvent::Partial { text } if text == " Bonjour"));

        let events =
            parser.process_chunk("event: completion\ndata: {\"completion\":\" Bonjour le monde\"}");
        assert_eq!(events.len(), 1);
        assert!(
            matches!(&events[0], TranslationEvent::Partial { text } if text == " Bonjour le monde")
        );
        assert_eq!(parser.accumulated(), " Bonjour le monde");
    }

    #[test]
    fn test_done_sentinel_produces_no_events() {
        let mut parser = LegacyCompleteParser::new();
        assert!(parser
            .process_chunk("event: completion\ndata: [DONE]")
            .is_empty());
        assert!(parser.process_chunk("data: [DONE]").is_empty());
    }

    #[test]
    fn test_empty_completion_snapshot_ignored() {
        let mut parser = LegacyCompleteParser::new();
        let events = parser.process_chunk("event: completion\ndata: {\"completion\":\"\"}");
        assert!(events.is_empty());
        assert_eq!(parser.accumulated(), "");
    }

    #[test]
    fn test_missing_completion_field_is_api_failure() {
        let mut parser = LegacyCompleteParser::new();
        let events = parser.process_chunk("event: completion\ndata: {\"stop_reason\":\"stop\"}");
        assert_eq!(events.len(), 1);
        match &events[0] {
            TranslationEvent::Failure { error } => {
                assert_eq!(error.kind(), ErrorKind::Api);
                assert_eq!(error.to_string(), "接口未返回结果");
            }
            other => panic!("意外事件: {other:?}"),
        }
    }

    #[test]
    fn test_ping_ignored() {
        let mut parser = LegacyCompleteParser::new();
        assert!(parser.process_chunk("event: ping").is_empty());
    }

    #[test]
    fn test_fragment_recovered_across_chunks() {
        let mut parser = LegacyCompleteParser::new();

        // 载荷在 JSON 中间被截断
        let events = parser.process_chunk("event: completion\ndata: {\"completion\":\" Bon");
        assert!(events.is_empty());
        assert!(!parser.pending().is_empty());

        // 剩余片段作为裸行到达，拼接后解析成功
        let events = parser.process_chunk("jour\"}");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], TranslationEvent::Partial { text } if text == " Bonjour"));
        assert!(parser.pending().is_empty());
    }

    #[test]
    fn test_permanently_malformed_fragment_stalls_silently() {
        let mut parser = LegacyCompleteParser::new();
        assert!(parser.process_chunk("data: {\"completion\":\" Bon").is_empty());
        assert!(parser.process_chunk("not even close").is_empty());
        // 没有错误事件，缓冲继续持有
        assert!(!parser.pending().is_empty());
        assert_eq!(parser.accumulated(), "");
    }

    #[test]
    fn test_finish_yields_accumulated_snapshot() {
        let mut parser = LegacyCompleteParser::new();
        parser.process_chunk("event: completion\ndata: {\"completion\":\"终稿\"}");

        match parser.finish() {
            Some(TranslationEvent::Final { text }) => assert_eq!(text, "终稿"),
            other => panic!("意外事件: {other:?}"),
        }
    }
}
