//! Anthropic 接口数据模型
//!
//! 同时覆盖旧版 `/v1/complete` 与当前 `/v1/messages` 两种请求形态，
//! 以及 Messages SSE 流事件、补全快照与错误响应体。

use crate::prompt::PromptPair;
use serde::{Deserialize, Serialize};

/// 旧版补全接口的采样上限
pub const LEGACY_MAX_TOKENS: u32 = 100_000;
/// Messages 接口固定的输出上限
pub const MESSAGES_MAX_TOKENS: u32 = 4096;
/// 旧版对话停止序列
pub const HUMAN_STOP_SEQUENCE: &str = "\n\nHuman:";

/// 旧版补全接口请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens_to_sample: u32,
    pub stop_sequences: Vec<String>,
    pub temperature: f32,
    pub stream: bool,
}

/// 会话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Messages 接口请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

/// 单次请求体，两种接口形态之一
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Complete(CompleteRequest),
    Messages(MessagesRequest),
}

impl RequestBody {
    /// 组装旧版补全请求
    ///
    /// 系统与用户提示词合并进单个 `Human:` 轮次，`Assistant:` 侧
    /// 预置应答前缀引导模型直接输出译文。
    pub fn complete(model: &str, prompts: &PromptPair, temperature: f32, stream: bool) -> Self {
        let prompt = format!(
            "\n\nHuman: {}\n\n{}\n\nAssistant: OK, this is the translation result: ",
            prompts.system, prompts.user
        );
        RequestBody::Complete(CompleteRequest {
            model: model.to_string(),
            prompt,
            max_tokens_to_sample: LEGACY_MAX_TOKENS,
            stop_sequences: vec![HUMAN_STOP_SEQUENCE.to_string()],
            temperature,
            stream,
        })
    }

    /// 组装 Messages 请求
    pub fn messages(model: &str, prompts: &PromptPair, temperature: f32, stream: bool) -> Self {
        RequestBody::Messages(MessagesRequest {
            model: model.to_string(),
            system: Some(prompts.system.clone()),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompts.user.clone(),
            }],
            max_tokens: MESSAGES_MAX_TOKENS,
            temperature,
            stream,
        })
    }
}

/// 旧版补全快照
///
/// 流式时每个事件携带一份完整快照，`completion` 整体替换已累计的译文。
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSnapshot {
    pub completion: Option<String>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Messages SSE 流事件，按 `type` 标签区分
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEventBody {
    MessageStart,
    ContentBlockStart,
    ContentBlockDelta { delta: ContentDelta },
    ContentBlockStop,
    MessageDelta,
    MessageStop,
    Ping,
    Error { error: ApiErrorDetail },
    /// 未来新增的事件类型，直接忽略
    #[serde(other)]
    Unknown,
}

/// 增量内容
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDelta {
    TextDelta { text: String },
    /// 其它 delta 类型（思考、签名等）不影响译文
    #[serde(other)]
    Unknown,
}

/// Messages 接口非流式响应
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// 响应内容块
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Unknown,
}

/// 接口错误明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 错误响应外层；`detail` 是部分代理网关使用的字段
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
    #[serde(default)]
    pub detail: Option<String>,
}
