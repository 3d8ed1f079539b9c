//! Anthropic 接口客户端
//!
//! 负责组装 URL、请求头并发出 HTTP 请求。引擎通过 `Transport` trait
//! 与具体客户端解耦，测试时可注入脚本化的响应。

use crate::config::{ApiVariant, PluginConfig};
use crate::error::TranslateError;
use crate::models::anthropic::RequestBody;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 原始响应：状态码加响应体字节流
pub struct RawResponse {
    pub status: u16,
    pub body: BoxStream<'static, Result<Bytes, TranslateError>>,
}

impl RawResponse {
    /// 把响应体一次性读完（错误诊断与非流式模式用）
    pub async fn collect_body(self) -> String {
        let mut buf = Vec::new();
        let mut body = self.body;
        while let Some(chunk) = body.next().await {
            if let Ok(bytes) = chunk {
                buf.extend_from_slice(&bytes);
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// 传输层抽象
#[async_trait]
pub trait Transport: Send + Sync {
    /// 用指定 Key 发出一次补全请求
    async fn send(&self, api_key: &str, body: &RequestBody)
        -> Result<RawResponse, TranslateError>;
}

/// 基于 reqwest 的 Anthropic 客户端
pub struct ClaudeProvider {
    client: Client,
    config: PluginConfig,
}

impl ClaudeProvider {
    pub fn new(config: PluginConfig) -> Self {
        // 流式响应可能拖很长，总超时放宽到 5 分钟
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(300))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// 组装接口地址；`api_url_path` 显式配置优先于形态默认路径
    fn build_url(&self) -> String {
        let base = self.config.api_url.trim_end_matches('/');
        format!("{}{}", base, self.config.endpoint_path())
    }
}

#[async_trait]
impl Transport for ClaudeProvider {
    async fn send(
        &self,
        api_key: &str,
        body: &RequestBody,
    ) -> Result<RawResponse, TranslateError> {
        let url = self.build_url();
        debug!(
            "[ClaudeProvider] POST {} variant={:?} stream={}",
            url, self.config.variant, self.config.stream
        );

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", self.config.variant.anthropic_version());
        if self.config.variant == ApiVariant::LegacyComplete {
            request = request.header("Accept", "application/json");
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|err| TranslateError::Network(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map_err(|err| TranslateError::Network(err.to_string()))
            .boxed();

        Ok(RawResponse { status, body })
    }
}
