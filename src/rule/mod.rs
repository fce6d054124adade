//! # 规则处理模块
//!
//! 此模块负责：
//! 1. 从下载的文本中提取 Clash 域名规则行
//! 2. 跨来源去重合并，保持首次出现顺序
//! 3. 按首字符分桶（数字 → 字母 → 其它）并写出 payload 文件

pub mod extract;
mod merge;

pub use merge::{run_job, Category, MergeJob, MergeStats};
