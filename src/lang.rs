//! 语言表
//!
//! Bob 标准语言代码到模型可读语言名的静态映射。
//! 进程启动时构建一次，之后只读；查不到的代码原样返回。

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// 支持的语言（定义顺序即宿主注册顺序）
pub const SUPPORT_LANGUAGES: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("zh-Hans", "Simplified-Chinese"),
    ("zh-Hant", "Traditional-Chinese"),
    ("yue", "Cantonese"),
    ("wyw", "classical-Chinese"),
    ("en", "English"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("ar", "Arabic"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("id", "Indonesian"),
    ("ms", "Malay"),
    ("hi", "Hindi"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("he", "Hebrew"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("fi", "Finnish"),
    ("no", "Norwegian"),
    ("cs", "Czech"),
    ("sk", "Slovak"),
    ("hu", "Hungarian"),
    ("el", "Greek"),
    ("ro", "Romanian"),
    ("bg", "Bulgarian"),
    ("fa", "Persian"),
    ("ur", "Urdu"),
    ("bn", "Bengali"),
    ("ta", "Tamil"),
    ("mn", "Mongolian"),
    ("my", "Burmese"),
    ("km", "Khmer"),
    ("lo", "Lao"),
];

static LANG_MAP: Lazy<IndexMap<&'static str, &'static str>> =
    Lazy::new(|| SUPPORT_LANGUAGES.iter().copied().collect());

/// 语言代码解析为语言名；未知代码原样返回
pub fn resolve(code: &str) -> &str {
    LANG_MAP.get(code).copied().unwrap_or(code)
}

/// 支持的语言代码，保持表定义顺序
pub fn supported_codes() -> Vec<&'static str> {
    LANG_MAP.keys().copied().collect()
}

pub fn is_supported(code: &str) -> bool {
    LANG_MAP.contains_key(code)
}
