//! 宿主侧数据契约
//!
//! Bob 宿主的查询对象与 `onStream` / `onCompletion` 回调载荷形态。
//! 字段命名跟随宿主约定（`toParagraphs`、错误载荷里的 `addtion`）。

use crate::error::ErrorPayload;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// 一次翻译请求
///
/// 一次调用期间不可变；`cancel` 触发后不再有任何回调，
/// 宿主应把"没有终态回调"理解为取消而不是挂起。
#[derive(Debug, Clone)]
pub struct TranslateQuery {
    pub text: String,
    pub detect_from: String,
    pub detect_to: String,
    /// 协作式取消信号
    pub cancel: CancellationToken,
}

impl TranslateQuery {
    pub fn new(text: &str, detect_from: &str, detect_to: &str) -> Self {
        Self {
            text: text.to_string(),
            detect_from: detect_from.to_string(),
            detect_to: detect_to.to_string(),
            cancel: CancellationToken::new(),
        }
    }
}

/// 翻译结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub from: String,
    pub to: String,
    #[serde(rename = "toParagraphs")]
    pub to_paragraphs: Vec<String>,
}

impl TranslationResult {
    /// 单段结果
    pub fn single(from: &str, to: &str, text: String) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            to_paragraphs: vec![text],
        }
    }
}

/// 非终态回调载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamPayload {
    pub result: TranslationResult,
}

/// 终态回调载荷：结果或错误，恰好上报一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionPayload {
    Result { result: TranslationResult },
    Error { error: ErrorPayload },
}

impl CompletionPayload {
    pub fn is_error(&self) -> bool {
        matches!(self, CompletionPayload::Error { .. })
    }
}
