//! # 去重合并与 payload 输出
//!
//! 对一个分类的多个来源：依次下载、提取规则行、
//! 跨来源去重（保留首次出现顺序），再按首字符分桶
//! （数字 → 字母 → 其它，桶内保序），最后写出 payload 文件。

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::fetch::Fetch;

use super::extract::{extract_rule_lines, key_char, Bucket};

/// 规则分类，对应三个内置合并任务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 直连域名
    Direct,
    /// 代理域名
    Proxy,
    /// 广告/拦截域名
    Reject,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Direct => write!(f, "direct"),
            Category::Proxy => write!(f, "proxy"),
            Category::Reject => write!(f, "reject"),
        }
    }
}

/// 一个合并任务：一个分类的 URL 列表和输出路径
#[derive(Debug, Clone)]
pub struct MergeJob {
    /// 分类
    pub category: Category,
    /// 来源 URL，按列表顺序处理
    pub urls: Vec<String>,
    /// 输出文件路径，每次运行整体重写
    pub output: PathBuf,
}

/// 合并统计
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MergeStats {
    /// 所有来源提取到的规则行总数（含重复）
    pub total: usize,
    /// 去重后保留的行数
    pub unique: usize,
}

/// 跨来源去重合并
///
/// 按 URL 列表顺序逐个下载并提取规则行；对每行做精确字符串
/// 去重，首次出现的行按顺序进入结果，之后的重复被跳过。
/// 任一下载失败则整个合并失败，不产生部分结果。
pub fn merge_sources(fetcher: &dyn Fetch, urls: &[String]) -> Result<(Vec<String>, MergeStats)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<String> = Vec::new();
    let mut total = 0;

    for url in urls {
        let lines = fetcher.fetch(url)?;
        let rule_lines = extract_rule_lines(&lines);

        for line in rule_lines {
            total += 1;
            if !seen.contains(&line) {
                seen.insert(line.clone());
                merged.push(line); // 保序加入
            }
        }
    }

    let stats = MergeStats {
        total,
        unique: merged.len(),
    };
    Ok((merged, stats))
}

/// 按首字符分桶的稳定排序
///
/// 1. 0-9
/// 2. a-z
/// 3. 其它字符最后
///
/// 桶内保持输入顺序（稳定），桶间按上述固定顺序拼接。
/// 桶内不做字典序排序。
pub fn group_stable(lines: Vec<String>) -> Vec<String> {
    let mut digit = Vec::new();
    let mut alpha = Vec::new();
    let mut other = Vec::new();

    for line in lines {
        match Bucket::classify(key_char(&line)) {
            Bucket::Digit => digit.push(line),
            Bucket::Alpha => alpha.push(line),
            Bucket::Other => other.push(line),
        }
    }

    // 合并：数字 → 字母 → 其它
    digit.extend(alpha);
    digit.extend(other);
    digit
}

/// 写出 payload 文件
///
/// 截断式全量重写：第一行固定为 `payload:`，
/// 之后每条规则一行，以 \n 结尾。非原子写入，无临时文件。
pub fn write_payload(path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "payload:")
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    for line in lines {
        writeln!(out, "{}", line)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}

/// 执行一个合并任务
///
/// 先完成该分类全部来源的下载与去重，成功后才写文件；
/// 下载阶段失败时不会产生输出文件。
pub fn run_job(fetcher: &dyn Fetch, job: &MergeJob) -> Result<MergeStats> {
    let (merged, stats) = merge_sources(fetcher, &job.urls)?;
    let sorted = group_stable(merged);
    write_payload(&job.output, &sorted)?;
    Ok(stats)
}
