//! 接口数据模型

pub mod anthropic;
