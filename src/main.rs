//! # clash-rules-merge
//!
//! CLI 工具：下载远程 Clash 域名规则列表，去重合并后
//! 按首字符分组（0-9 → a-z → 其它）输出 payload 文件。
//!
//! ## 功能
//! - 按分类（direct / proxy / reject）依次下载各来源的规则文本
//! - 提取以 '-' 开头的规则行，跨来源精确去重，保留首次出现顺序
//! - 按域名首字符分桶后整体重写输出文件，首行固定 `payload:`
//!
//! ## 使用
//! ```bash
//! # 运行全部三个内置任务
//! clash-rules-merge
//!
//! # 只处理 reject 分类
//! clash-rules-merge merge reject
//!
//! # 输出到指定目录，JSON 格式统计
//! clash-rules-merge merge --output-dir ./out --json
//! ```

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod fetch;
mod rule;

use fetch::HttpFetcher;
use rule::{run_job, Category, MergeJob, MergeStats};

/// 单个请求的默认超时（秒）
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// 直连域名规则 url 列表
const DIRECT_URLS: &[&str] =
    &["https://raw.githubusercontent.com/Loyalsoldier/clash-rules/release/direct.txt"];

/// 代理域名规则 url 列表
const PROXY_URLS: &[&str] =
    &["https://raw.githubusercontent.com/Loyalsoldier/clash-rules/release/proxy.txt"];

/// 广告域名规则 url 列表
const REJECT_URLS: &[&str] = &[
    "https://anti-ad.net/clash.yaml",
    "https://raw.githubusercontent.com/Loyalsoldier/clash-rules/release/reject.txt",
    "https://raw.githubusercontent.com/REIJI007/AdBlock_Rule_For_Clash/main/adblock_reject.yaml",
];

// ========================================
// CLI 参数定义
// ========================================

/// Clash 域名规则合并工具
#[derive(Parser)]
#[command(name = "clash-rules-merge")]
#[command(version = "0.1.0")]
#[command(about = "Merge remote Clash domain rule lists into deduplicated payload files")]
struct Cli {
    /// 子命令；省略时等价于不带参数的 merge
    #[command(subcommand)]
    command: Option<Commands>,
}

/// 支持的子命令
#[derive(Subcommand)]
enum Commands {
    /// 下载并合并规则列表
    Merge {
        /// 只处理指定分类 (可选，默认三个分类依次全部处理)
        category: Option<Category>,

        /// 输出目录 (可选，默认当前目录)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// 单个请求的超时秒数
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// JSON 格式输出统计
        #[arg(long)]
        json: bool,
    },
}

/// 单个任务的统计摘要，用于 --json 输出
#[derive(Serialize)]
struct JobSummary {
    category: Category,
    output: PathBuf,
    #[serde(flatten)]
    stats: MergeStats,
}

// ========================================
// 主函数
// ========================================

fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 无子命令时运行全部内置任务
    let result = match cli.command {
        Some(Commands::Merge {
            category,
            output_dir,
            timeout,
            json,
        }) => run_merge(category, output_dir, timeout, json),
        None => run_merge(None, None, DEFAULT_TIMEOUT_SECS, false),
    };

    // 处理错误
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// 构造内置任务表
fn builtin_jobs(output_dir: Option<&PathBuf>) -> Vec<MergeJob> {
    let categories = [
        (
            Category::Direct,
            DIRECT_URLS,
            "clash_direct_domain_rules_merged.txt",
        ),
        (
            Category::Proxy,
            PROXY_URLS,
            "clash_proxy_domain_rules_merged.txt",
        ),
        (
            Category::Reject,
            REJECT_URLS,
            "clash_reject_domain_rules_merged.txt",
        ),
    ];

    categories
        .into_iter()
        .map(|(category, urls, filename)| MergeJob {
            category,
            urls: urls.iter().map(|u| u.to_string()).collect(),
            output: match output_dir {
                Some(dir) => dir.join(filename),
                None => PathBuf::from(filename),
            },
        })
        .collect()
}

/// 执行合并命令
fn run_merge(
    category: Option<Category>,
    output_dir: Option<PathBuf>,
    timeout: u64,
    json_output: bool,
) -> Result<()> {
    let fetcher = HttpFetcher::new(Duration::from_secs(timeout))?;

    // 按分类过滤任务表（未指定则全部）
    let jobs: Vec<MergeJob> = builtin_jobs(output_dir.as_ref())
        .into_iter()
        .filter(|job| category.map_or(true, |c| job.category == c))
        .collect();

    let mut summaries = Vec::new();

    // 任务顺序执行，单线程，同一时刻只有一个请求在途。
    // 任一任务失败立即向上传播，终止整个进程。
    for job in &jobs {
        let stats = run_job(&fetcher, job)?;

        if !json_output {
            println!(
                "{}: {} unique rules ({} lines read) -> {}",
                job.category,
                stats.unique,
                stats.total,
                job.output.display()
            );
        }

        summaries.push(JobSummary {
            category: job.category,
            output: job.output.clone(),
            stats,
        });
    }

    if json_output {
        // JSON 格式输出
        let json = serde_json::to_string_pretty(&summaries)?;
        println!("{}", json);
    }

    Ok(())
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_jobs_default_paths() {
        let jobs = builtin_jobs(None);
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].category, Category::Direct);
        assert_eq!(
            jobs[0].output,
            PathBuf::from("clash_direct_domain_rules_merged.txt")
        );
        assert_eq!(jobs[1].category, Category::Proxy);
        assert_eq!(jobs[2].category, Category::Reject);
        assert_eq!(jobs[2].urls.len(), 3);
    }

    #[test]
    fn test_builtin_jobs_output_dir() {
        let dir = PathBuf::from("/tmp/rules");
        let jobs = builtin_jobs(Some(&dir));
        assert_eq!(
            jobs[1].output,
            PathBuf::from("/tmp/rules/clash_proxy_domain_rules_merged.txt")
        );
    }
}
