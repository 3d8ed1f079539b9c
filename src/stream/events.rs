//! 翻译事件中间表示
//!
//! 解析器产出统一的 `TranslationEvent`，投递层再映射成宿主回调，
//! 两侧互不感知。

use crate::error::TranslateError;

/// 单次请求生命周期内的事件
///
/// 约定：任意多个 `Partial` 之后至多一个终态（`Final` 或 `Failure`）。
/// 请求被取消时序列直接截断，不再出现终态。
#[derive(Debug, Clone)]
pub enum TranslationEvent {
    /// 非终态，携带当前累计的完整译文
    Partial { text: String },
    /// 终态，最终译文
    Final { text: String },
    /// 终态，错误
    Failure { error: TranslateError },
}

impl TranslationEvent {
    /// 是否终结事件序列
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TranslationEvent::Partial { .. })
    }
}
