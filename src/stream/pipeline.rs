//! 字节流 → 翻译事件流
//!
//! 把 HTTP 响应的字节流喂给形态对应的解析器，产出 `TranslationEvent`
//! 序列。终态事件之后流立即结束；传输层错误映射成 `Failure` 终态。

use crate::config::ApiVariant;
use crate::error::TranslateError;
use crate::stream::events::TranslationEvent;
use crate::stream::parsers::ResponseParser;
use bytes::Bytes;
use futures::{Stream, StreamExt};

/// 把字节流转换为翻译事件流
pub fn event_stream<S>(
    byte_stream: S,
    variant: ApiVariant,
) -> impl Stream<Item = TranslationEvent>
where
    S: Stream<Item = Result<Bytes, TranslateError>>,
{
    async_stream::stream! {
        let mut parser = ResponseParser::for_variant(variant);
        let mut byte_stream = std::pin::pin!(byte_stream);

        while let Some(result) = byte_stream.next().await {
            match result {
                Ok(bytes) => {
                    let chunk = String::from_utf8_lossy(&bytes);
                    for event in parser.process_chunk(&chunk) {
                        let terminal = event.is_terminal();
                        yield event;
                        if terminal {
                            return;
                        }
                    }
                }
                Err(error) => {
                    yield TranslationEvent::Failure { error };
                    return;
                }
            }
        }

        // 流自然结束，由解析器决定是否补发终态
        if let Some(event) = parser.finish() {
            yield event;
        }
    }
}
