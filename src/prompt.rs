//! 提示词构建
//!
//! 根据语向生成翻译或润色指令。自定义模板优先于内置规则；
//! 原文包裹在三反引号分隔符里，并明确要求模型不要引入原文之外的内容。
//! 分隔符本身没有做转义，原文里出现三反引号时会污染指令（已知缺口）。

use crate::lang;

/// 默认系统提示词
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a translation engine that can only translate text and cannot interpret it.";

const TRANSLATION_PREFIX: &str = "Please translate below text";

/// 系统提示词 + 用户提示词
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// 模板占位符替换
///
/// `$text` 最后替换，避免原文里的 `$sourceLang` / `$targetLang` 被二次展开。
fn apply_template(template: &str, text: &str, source: &str, target: &str) -> String {
    template
        .replace("$sourceLang", source)
        .replace("$targetLang", target)
        .replace("$text", text)
}

/// 内置指令，按优先级匹配语向
fn builtin_instruction(detect_from: &str, detect_to: &str) -> String {
    let target = lang::resolve(detect_to);

    if detect_from == detect_to {
        // 同语向退化为润色
        return if matches!(detect_to, "zh-Hans" | "zh-Hant") {
            "润色此句".to_string()
        } else {
            "Polish this sentence".to_string()
        };
    }

    if matches!(detect_from, "wyw" | "zh-Hans" | "zh-Hant") {
        // 中文变体互转用固定指令，优先于下面的短形式
        match detect_to {
            "zh-Hant" => return format!("{TRANSLATION_PREFIX} to traditional Chinese"),
            "zh-Hans" => return format!("{TRANSLATION_PREFIX} to simplified Chinese"),
            "yue" => return format!("{TRANSLATION_PREFIX} to Cantonese"),
            _ => {}
        }
    }

    if matches!(detect_to, "wyw" | "yue") {
        // 文言文/粤语目标不复述源语言
        return format!("{TRANSLATION_PREFIX} to \"{target}\"");
    }

    let source = lang::resolve(detect_from);
    format!("{TRANSLATION_PREFIX} from \"{source}\" to \"{target}\"")
}

/// 构建一次请求的提示词
///
/// 非空的自定义模板整体替换对应的内置提示词。
pub fn build_prompts(
    detect_from: &str,
    detect_to: &str,
    text: &str,
    custom_system: Option<&str>,
    custom_user: Option<&str>,
) -> PromptPair {
    let source = lang::resolve(detect_from).to_string();
    let target = lang::resolve(detect_to).to_string();

    let system = match custom_system {
        Some(template) if !template.trim().is_empty() => {
            apply_template(template, text, &source, &target)
        }
        _ => DEFAULT_SYSTEM_PROMPT.to_string(),
    };

    let user = match custom_user {
        Some(template) if !template.trim().is_empty() => {
            apply_template(template, text, &source, &target)
        }
        _ => {
            let instruction = builtin_instruction(detect_from, detect_to);
            format!(
                "{instruction}:\n\n```\n{text}\n```\n\nDo not add any content or symbols that does not exist in the original text.\n"
            )
        }
    };

    PromptPair { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_prompts(from: &str, to: &str, text: &str) -> PromptPair {
        build_prompts(from, to, text, None, None)
    }

    #[test]
    fn test_generic_pair_names_both_languages_and_text() {
        let prompts = default_prompts("en", "ja", "good morning");
        assert!(prompts.user.contains("\"English\""));
        assert!(prompts.user.contains("\"Japanese\""));
        assert!(prompts.user.contains("good morning"));
        assert_eq!(prompts.system, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_generic_pairs_always_carry_resolved_names() {
        // 通用规则覆盖的语向都要带上源/目标语言名与原文
        for (from, to) in [("en", "fr"), ("ja", "ko"), ("ru", "de"), ("en", "zh-Hans")] {
            let prompts = default_prompts(from, to, "sample text");
            assert!(prompts.user.contains(crate::lang::resolve(from)), "{from}->{to}");
            assert!(prompts.user.contains(crate::lang::resolve(to)), "{from}->{to}");
            assert!(prompts.user.contains("sample text"));
        }
    }

    #[test]
    fn test_same_language_requests_polish() {
        let en = default_prompts("en", "en", "hi there");
        assert!(en.user.contains("Polish this sentence"));
        assert!(!en.user.contains("translate"));

        let zh = default_prompts("zh-Hans", "zh-Hans", "你好");
        assert!(zh.user.contains("润色此句"));
        assert!(!zh.user.contains("translate"));
    }

    #[test]
    fn test_classical_and_cantonese_targets_omit_source_name() {
        let wyw = default_prompts("en", "wyw", "hello");
        assert!(wyw.user.contains("to \"classical-Chinese\""));
        assert!(!wyw.user.contains("English"));

        let yue = default_prompts("ja", "yue", "こんにちは");
        assert!(yue.user.contains("to \"Cantonese\""));
        assert!(!yue.user.contains("Japanese"));
    }

    #[test]
    fn test_chinese_variant_conversions_use_fixed_instructions() {
        let hant = default_prompts("zh-Hans", "zh-Hant", "测试");
        assert!(hant.user.contains("to traditional Chinese"));

        let hans = default_prompts("zh-Hant", "zh-Hans", "測試");
        assert!(hans.user.contains("to simplified Chinese"));

        let yue = default_prompts("wyw", "yue", "将进酒");
        assert!(yue.user.contains("to Cantonese"));
        assert!(!yue.user.contains("classical-Chinese"));
    }

    #[test]
    fn test_text_is_fenced_with_no_echo_instruction() {
        let prompts = default_prompts("en", "fr", "line one\nline two");
        assert!(prompts.user.contains("```\nline one\nline two\n```"));
        assert!(prompts
            .user
            .contains("Do not add any content or symbols that does not exist in the original text."));
    }

    #[test]
    fn test_custom_templates_win() {
        let prompts = build_prompts(
            "en",
            "ja",
            "hello",
            Some("Translate for a $targetLang newspaper."),
            Some("$sourceLang -> $targetLang: $text"),
        );
        assert_eq!(prompts.system, "Translate for a Japanese newspaper.");
        assert_eq!(prompts.user, "English -> Japanese: hello");
    }

    #[test]
    fn test_blank_custom_template_falls_back() {
        let prompts = build_prompts("en", "ja", "hello", Some("   "), None);
        assert_eq!(prompts.system, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_placeholder_in_source_text_is_not_expanded() {
        let prompts = build_prompts("en", "ja", "cost is $sourceLang", None, Some("$text"));
        assert_eq!(prompts.user, "cost is $sourceLang");
    }
}
