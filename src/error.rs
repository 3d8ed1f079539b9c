//! 错误类型与宿主错误载荷
//!
//! 所有错误最终都收敛成宿主期望的 `{ type, message, addtion }` 形态，
//! 每次请求恰好上报一次终态。

use crate::models::anthropic::ApiErrorBody;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 宿主侧错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 目标语种不在语言表中
    #[serde(rename = "unsupportLanguage")]
    UnsupportLanguage,
    /// 没有可用的 API Key
    #[serde(rename = "secretKey")]
    SecretKey,
    /// 客户端侧问题：参数非法、请求被拒、本地解析失败
    #[serde(rename = "param")]
    Param,
    /// 上游问题：5xx、缺少期望字段
    #[serde(rename = "api")]
    Api,
    /// 异步管线里未归类的异常
    #[serde(rename = "unknown")]
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportLanguage => "unsupportLanguage",
            ErrorKind::SecretKey => "secretKey",
            ErrorKind::Param => "param",
            ErrorKind::Api => "api",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// HTTP 状态码归类：`[400, 500)` 视为客户端/配置问题，其余归上游
    pub fn from_status(status: u16) -> Self {
        if (400..500).contains(&status) {
            ErrorKind::Param
        } else {
            ErrorKind::Api
        }
    }
}

/// 翻译过程中的错误
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// 目标语种不受支持
    #[error("不支持该语种")]
    UnsupportedLanguage,

    /// 插件配置里没有填写任何 API Key
    #[error("配置错误 - 未填写 API Keys")]
    MissingApiKey,

    /// 待翻译文本为空
    #[error("翻译文本不能为空")]
    EmptyText,

    /// 上游 HTTP 错误响应，按状态码归类
    #[error("接口响应错误 - {message}")]
    Http {
        status: u16,
        message: String,
        /// 原始响应体，透传给宿主做诊断
        body: Option<String>,
    },

    /// 流内上报的接口错误（SSE `error` 事件）
    #[error("接口响应错误 - {message}")]
    Upstream {
        message: String,
        detail: Option<String>,
    },

    /// 响应里没有期望的补全字段
    #[error("接口未返回结果")]
    MissingField { body: Option<String> },

    /// 本地 JSON 解析失败
    #[error("JSON 解析错误: {0}")]
    Parse(String),

    /// 网络层失败（连接、超时、流中断）
    #[error("网络请求失败: {0}")]
    Network(String),

    /// 未归类错误
    #[error("未知错误: {0}")]
    Unknown(String),
}

impl TranslateError {
    /// 宿主侧分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::UnsupportedLanguage => ErrorKind::UnsupportLanguage,
            TranslateError::MissingApiKey => ErrorKind::SecretKey,
            TranslateError::EmptyText => ErrorKind::Param,
            TranslateError::Http { status, .. } => ErrorKind::from_status(*status),
            TranslateError::Upstream { .. } => ErrorKind::Api,
            TranslateError::MissingField { .. } => ErrorKind::Api,
            TranslateError::Parse(_) => ErrorKind::Param,
            TranslateError::Network(_) => ErrorKind::Api,
            TranslateError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// 诊断详情，对应宿主载荷的 `addtion` 字段
    pub fn addtion(&self) -> Option<String> {
        match self {
            TranslateError::UnsupportedLanguage => Some("不支持该语种".to_string()),
            TranslateError::MissingApiKey => Some("请在插件配置中填写 API Keys".to_string()),
            TranslateError::Http { body, .. } => body.clone(),
            TranslateError::Upstream { detail, .. } => detail.clone(),
            TranslateError::MissingField { body } => body.clone(),
            _ => None,
        }
    }

    /// 从上游错误响应构造；尽量从响应体里提取可读的错误信息
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error.and_then(|e| e.message).or(b.detail))
            .unwrap_or_else(|| format!("HTTP {status}"));
        TranslateError::Http {
            status,
            message: detail,
            body: Some(body.to_string()),
        }
    }

    /// 转换为宿主期望的错误载荷
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
            addtion: self.addtion(),
        }
    }
}

/// 宿主期望的错误载荷
///
/// `addtion` 是宿主契约里的固定拼写，序列化字段名不可更正。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addtion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_status() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Param);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::Param);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::Param);
        assert_eq!(ErrorKind::from_status(499), ErrorKind::Param);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Api);
        assert_eq!(ErrorKind::from_status(529), ErrorKind::Api);
        assert_eq!(ErrorKind::from_status(302), ErrorKind::Api);
    }

    #[test]
    fn test_http_error_kind_follows_status() {
        let not_found = TranslateError::from_response(404, "{}");
        assert_eq!(not_found.kind(), ErrorKind::Param);

        let server_error = TranslateError::from_response(500, "{}");
        assert_eq!(server_error.kind(), ErrorKind::Api);
    }

    #[test]
    fn test_from_response_extracts_message() {
        let body = r#"{"error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = TranslateError::from_response(401, body);
        assert_eq!(err.to_string(), "接口响应错误 - invalid x-api-key");
        // 原始响应体保留在诊断字段里
        assert_eq!(err.addtion().as_deref(), Some(body));
    }

    #[test]
    fn test_from_response_falls_back_to_status() {
        let err = TranslateError::from_response(502, "not json at all");
        assert_eq!(err.to_string(), "接口响应错误 - HTTP 502");
    }

    #[test]
    fn test_payload_serialization() {
        let payload = TranslateError::MissingApiKey.payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "secretKey");
        assert_eq!(json["message"], "配置错误 - 未填写 API Keys");
        assert_eq!(json["addtion"], "请在插件配置中填写 API Keys");
    }

    #[test]
    fn test_payload_kind_names() {
        assert_eq!(
            serde_json::to_value(ErrorKind::UnsupportLanguage).unwrap(),
            "unsupportLanguage"
        );
        assert_eq!(serde_json::to_value(ErrorKind::Unknown).unwrap(), "unknown");
    }

    #[test]
    fn test_parse_error_is_param() {
        let err = TranslateError::Parse("expected value at line 1".to_string());
        assert_eq!(err.kind(), ErrorKind::Param);
        assert!(err.to_string().starts_with("JSON 解析错误"));
    }
}
