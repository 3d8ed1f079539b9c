//! API Key 凭证选择
//!
//! 把"这次请求用哪个 Key"抽象成可注入的策略：默认实现按请求随机挑选，
//! 轮询实现把请求均匀摊到各个 Key 上，测试里可以换成确定性选择。

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 解析逗号分隔的 Key 列表；各项去除首尾空白，空项丢弃
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|key| key.trim())
        .filter(|key| !key.is_empty())
        .map(|key| key.to_string())
        .collect()
}

/// Key 选择策略
pub trait KeySelector: Send + Sync {
    /// 取下一个可用 Key；没有任何可用 Key 时返回 `None`
    fn next_key(&self) -> Option<String>;
}

/// 每次请求随机挑选一个 Key
pub struct RandomKeySelector {
    keys: Vec<String>,
}

impl RandomKeySelector {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn from_raw(raw: &str) -> Self {
        Self::new(parse_api_keys(raw))
    }
}

impl KeySelector for RandomKeySelector {
    fn next_key(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..self.keys.len());
        Some(self.keys[idx].clone())
    }
}

/// 轮询选择，请求依次轮转各个 Key
pub struct RoundRobinKeySelector {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl RoundRobinKeySelector {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        Self::new(parse_api_keys(raw))
    }
}

impl KeySelector for RoundRobinKeySelector {
    fn next_key(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        Some(self.keys[idx].clone())
    }
}
