//! 插件配置
//!
//! 宿主以配置项形式注入：模型、Key 列表、接口地址、可选的
//! 自定义提示词模板与采样温度。所有字段都有缺省值。

use serde::{Deserialize, Serialize};

/// 目标接口形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiVariant {
    /// 旧版单 prompt 补全接口
    LegacyComplete,
    /// 当前会话式补全接口
    #[default]
    Messages,
}

impl ApiVariant {
    /// 形态对应的默认接口路径
    pub fn default_path(&self) -> &'static str {
        match self {
            ApiVariant::LegacyComplete => "/v1/complete",
            ApiVariant::Messages => "/v1/messages",
        }
    }

    /// 形态对应的 `anthropic-version` 请求头
    pub fn anthropic_version(&self) -> &'static str {
        match self {
            ApiVariant::LegacyComplete => "2023-01-01",
            ApiVariant::Messages => "2023-06-01",
        }
    }
}

fn default_api_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_stream() -> bool {
    true
}

/// 插件配置项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// 模型名
    #[serde(default)]
    pub model: String,
    /// 逗号分隔的 API Key 列表
    #[serde(default)]
    pub api_keys: String,
    /// 接口基地址
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// 显式接口路径，覆盖形态默认路径
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url_path: Option<String>,
    /// 自定义系统提示词模板（$text / $sourceLang / $targetLang）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_system_prompt: Option<String>,
    /// 自定义用户提示词模板
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_user_prompt: Option<String>,
    /// 采样温度
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 接口形态
    #[serde(default)]
    pub variant: ApiVariant,
    /// 是否流式返回
    #[serde(default = "default_stream")]
    pub stream: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            api_keys: String::new(),
            api_url: default_api_url(),
            api_url_path: None,
            custom_system_prompt: None,
            custom_user_prompt: None,
            temperature: default_temperature(),
            variant: ApiVariant::default(),
            stream: default_stream(),
        }
    }
}

impl PluginConfig {
    pub fn new(model: &str, api_keys: &str) -> Self {
        Self {
            model: model.to_string(),
            api_keys: api_keys.to_string(),
            ..Self::default()
        }
    }

    /// 实际请求路径；显式配置优先
    pub fn endpoint_path(&self) -> &str {
        match &self.api_url_path {
            Some(path) if !path.is_empty() => path,
            _ => self.variant.default_path(),
        }
    }
}
