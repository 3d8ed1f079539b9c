//! 翻译引擎
//!
//! 串联预检、提示词、请求体、传输与流解析，产出 `TranslationEvent`
//! 序列；另提供把事件序列映射回宿主回调约定的薄适配层。
//!
//! 预检不通过时直接给出终态错误，不会发起网络请求。

use crate::config::{ApiVariant, PluginConfig};
use crate::credential::{KeySelector, RandomKeySelector};
use crate::error::TranslateError;
use crate::host::{CompletionPayload, StreamPayload, TranslateQuery, TranslationResult};
use crate::lang;
use crate::models::anthropic::{CompletionSnapshot, ContentBlock, MessagesResponse, RequestBody};
use crate::prompt;
use crate::provider::{ClaudeProvider, Transport};
use crate::stream::events::TranslationEvent;
use crate::stream::pipeline;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// 事件通道容量
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// 翻译引擎
pub struct Translator {
    config: PluginConfig,
    transport: Arc<dyn Transport>,
    keys: Arc<dyn KeySelector>,
}

impl Translator {
    /// 按插件配置构建默认引擎：reqwest 传输 + 随机 Key 选择
    pub fn new(config: PluginConfig) -> Self {
        let keys = RandomKeySelector::from_raw(&config.api_keys);
        let transport = ClaudeProvider::new(config.clone());
        Self::with_parts(config, Arc::new(transport), Arc::new(keys))
    }

    /// 注入自定义传输与 Key 策略
    pub fn with_parts(
        config: PluginConfig,
        transport: Arc<dyn Transport>,
        keys: Arc<dyn KeySelector>,
    ) -> Self {
        Self {
            config,
            transport,
            keys,
        }
    }

    /// 宿主注册用：支持的语言代码
    pub fn support_languages() -> Vec<&'static str> {
        lang::supported_codes()
    }

    /// 预检；通过时返回本次请求使用的 API Key
    fn preflight(&self, query: &TranslateQuery) -> Result<String, TranslateError> {
        if !lang::is_supported(&query.detect_to) {
            return Err(TranslateError::UnsupportedLanguage);
        }
        let key = self.keys.next_key().ok_or(TranslateError::MissingApiKey)?;
        if query.text.trim().is_empty() {
            return Err(TranslateError::EmptyText);
        }
        Ok(key)
    }

    fn build_body(&self, query: &TranslateQuery) -> RequestBody {
        let prompts = prompt::build_prompts(
            &query.detect_from,
            &query.detect_to,
            &query.text,
            self.config.custom_system_prompt.as_deref(),
            self.config.custom_user_prompt.as_deref(),
        );
        match self.config.variant {
            ApiVariant::LegacyComplete => RequestBody::complete(
                &self.config.model,
                &prompts,
                self.config.temperature,
                self.config.stream,
            ),
            ApiVariant::Messages => RequestBody::messages(
                &self.config.model,
                &prompts,
                self.config.temperature,
                self.config.stream,
            ),
        }
    }

    /// 产出事件序列
    ///
    /// 任意多个 `Partial` 后至多一个终态；请求被取消时通道直接关闭，
    /// 不再有终态事件。
    pub fn translate_events(&self, query: TranslateQuery) -> mpsc::Receiver<TranslationEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let request_id = Uuid::new_v4();

        let api_key = match self.preflight(&query) {
            Ok(key) => key,
            Err(err) => {
                warn!("[Translator] 预检失败 request_id={} error={}", request_id, err);
                let _ = tx.try_send(TranslationEvent::Failure { error: err });
                return rx;
            }
        };

        let body = self.build_body(&query);
        let transport = Arc::clone(&self.transport);
        let config = self.config.clone();
        tokio::spawn(async move {
            run_request(request_id, transport, config, api_key, body, query, tx).await;
        });
        rx
    }

    /// 薄适配层：把事件序列映射回宿主的 `onStream` / `onCompletion` 约定
    ///
    /// 终态回调恰好触发一次；取消时通道关闭，不触发任何终态回调。
    pub async fn translate<S, C>(&self, query: TranslateQuery, on_stream: S, on_completion: C)
    where
        S: Fn(StreamPayload),
        C: FnOnce(CompletionPayload),
    {
        let from = query.detect_from.clone();
        let to = query.detect_to.clone();
        let mut events = self.translate_events(query);

        while let Some(event) = events.recv().await {
            match event {
                TranslationEvent::Partial { text } => {
                    on_stream(StreamPayload {
                        result: TranslationResult::single(&from, &to, text),
                    });
                }
                TranslationEvent::Final { text } => {
                    on_completion(CompletionPayload::Result {
                        result: TranslationResult::single(&from, &to, text),
                    });
                    return;
                }
                TranslationEvent::Failure { error } => {
                    on_completion(CompletionPayload::Error {
                        error: error.payload(),
                    });
                    return;
                }
            }
        }
        // 通道在终态前关闭：按取消处理，不再回调
    }
}

async fn run_request(
    request_id: Uuid,
    transport: Arc<dyn Transport>,
    config: PluginConfig,
    api_key: String,
    body: RequestBody,
    query: TranslateQuery,
    tx: mpsc::Sender<TranslationEvent>,
) {
    let cancel = query.cancel.clone();

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("[Translator] 请求发出前已取消 request_id={}", request_id);
            return;
        }
        outcome = transport.send(&api_key, &body) => outcome,
    };

    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            error!("[Translator] 请求失败 request_id={} error={}", request_id, err);
            let _ = tx.send(TranslationEvent::Failure { error: err }).await;
            return;
        }
    };

    if response.status >= 400 {
        let status = response.status;
        let raw = response.collect_body().await;
        warn!(
            "[Translator] 上游错误 request_id={} status={}",
            request_id, status
        );
        let _ = tx
            .send(TranslationEvent::Failure {
                error: TranslateError::from_response(status, &raw),
            })
            .await;
        return;
    }

    if !config.stream {
        // 非流式：一次性读完响应体再解析
        let raw = response.collect_body().await;
        let _ = tx.send(parse_single_response(&raw, config.variant)).await;
        return;
    }

    let events = pipeline::event_stream(response.body, config.variant);
    let mut events = std::pin::pin!(events);
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("[Translator] 请求已取消 request_id={}", request_id);
                return;
            }
            next = events.next() => next,
        };
        match next {
            Some(event) => {
                let terminal = event.is_terminal();
                if tx.send(event).await.is_err() {
                    // 接收端已放弃
                    return;
                }
                if terminal {
                    return;
                }
            }
            None => return,
        }
    }
}

/// 解析非流式响应体
fn parse_single_response(raw: &str, variant: ApiVariant) -> TranslationEvent {
    match variant {
        ApiVariant::LegacyComplete => match serde_json::from_str::<CompletionSnapshot>(raw) {
            Ok(snapshot) => match snapshot.completion {
                Some(text) => TranslationEvent::Final { text },
                None => TranslationEvent::Failure {
                    error: TranslateError::MissingField {
                        body: Some(raw.to_string()),
                    },
                },
            },
            Err(err) => TranslationEvent::Failure {
                error: TranslateError::Parse(err.to_string()),
            },
        },
        ApiVariant::Messages => match serde_json::from_str::<MessagesResponse>(raw) {
            Ok(response) => {
                let text: String = response
                    .content
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::Text { text } => Some(text.as_str()),
                        ContentBlock::Unknown => None,
                    })
                    .collect();
                if text.is_empty() {
                    TranslationEvent::Failure {
                        error: TranslateError::MissingField {
                            body: Some(raw.to_string()),
                        },
                    }
                } else {
                    TranslationEvent::Final { text }
                }
            }
            Err(err) => TranslationEvent::Failure {
                error: TranslateError::Parse(err.to_string()),
            },
        },
    }
}
