//! # 下载模块
//!
//! 负责通过 HTTP 拉取远程规则列表文本：
//! 1. 带超时的同步 GET 请求（无重试）
//! 2. 按响应头声明的编码或 BOM 猜测编码并解码
//! 3. 按通用换行约定切分为行

use std::time::Duration;

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;

/// 拉取能力抽象
///
/// 提取/去重/分组逻辑只依赖此 trait，
/// 测试时可注入内存中的假数据，不需要真实网络。
pub trait Fetch {
    /// 下载一个 URL，返回解码后的行列表
    fn fetch(&self, url: &str) -> Result<Vec<String>>;
}

/// 基于 reqwest blocking 客户端的实现
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// 创建客户端，timeout 为单个请求的总超时
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<String>> {
        // 进度信息走 stderr，不污染 stdout 的统计输出
        eprintln!("downloading: {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request failed: {}", url))?;

        // 非 2xx 状态视为失败，中止当前分类的合并
        let resp = resp
            .error_for_status()
            .with_context(|| format!("Request failed: {}", url))?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = resp
            .bytes()
            .with_context(|| format!("Failed to read response body: {}", url))?;

        let text = decode_body(&bytes, content_type.as_deref());
        Ok(split_lines(&text))
    }
}

/// 解码响应体
///
/// 优先级：Content-Type 声明的 charset → BOM 嗅探 → UTF-8（宽松）。
/// 对应 Python requests 的 `resp.apparent_encoding` 行为的简化版。
fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(|ct| {
            ct.split(';')
                .find_map(|part| part.trim().strip_prefix("charset="))
        })
        .map(|label| label.trim_matches('"'))
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    let encoding = declared
        .or_else(|| Encoding::for_bom(bytes).map(|(enc, _)| enc))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// 按通用换行约定（\r\n / \n / \r）切分，不保留换行符本身
fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized.lines().map(|l| l.to_string()).collect()
}
