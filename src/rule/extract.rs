//! # 规则行提取与分桶键计算
//!
//! 纯文本处理，不做任何 I/O：
//! - 从 YAML 或 TXT 行中筛出以 '-' 开头的 clash 域名规则行
//! - 计算规则的分桶键（真正的域名首字符，而不是 "- +." 前缀）

/// 去掉规则前缀后剩余为空时使用的哨兵字符，排在数字和字母之后
pub const EMPTY_KEY: char = '~';

/// 从原始行中提取规则行
///
/// 只保留去掉首尾空白后以 '-' 开头的行（YAML 列表项的约定）。
/// 返回的行去掉了尾部 \r\n，但保留原有的前导空白，顺序不变。
/// 注释、`payload:` 之类的结构行、空行都被静默丢弃。
pub fn extract_rule_lines(lines: &[String]) -> Vec<String> {
    let mut results = Vec::new();
    for line in lines {
        if line.trim().starts_with('-') {
            results.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
    }
    results
}

/// 获取规则的分桶键
///
/// 例如：
///   `- +.0.myikas.com` → '0'
///   `- +.abc.com`      → 'a'
///
/// 去掉所有前导的 '-'、空格、'+'、'.'（任意顺序与重复），
/// 取剩余部分的首字符并转小写；剩余为空返回 [`EMPTY_KEY`]。
pub fn key_char(line: &str) -> char {
    let s = line.trim_start_matches(['-', ' ', '+', '.']);
    match s.chars().next() {
        Some(c) => c.to_lowercase().next().unwrap_or(c),
        None => EMPTY_KEY,
    }
}

/// 分桶类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// 0-9
    Digit,
    /// a-z
    Alpha,
    /// 其它字符（含哨兵、标点、非 ASCII）
    Other,
}

impl Bucket {
    /// 按分桶键分类
    pub fn classify(key: char) -> Self {
        if key.is_ascii_digit() {
            Bucket::Digit
        } else if key.is_ascii_lowercase() {
            Bucket::Alpha
        } else {
            Bucket::Other
        }
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_keeps_only_dash_lines() {
        let input = lines(&[
            "payload:",
            "  payload:",
            "# comment",
            "",
            "- +.example.com",
            "  - DOMAIN-SUFFIX,example.com",
        ]);
        let out = extract_rule_lines(&input);
        assert_eq!(out, vec!["- +.example.com", "  - DOMAIN-SUFFIX,example.com"]);
    }

    #[test]
    fn test_extract_strips_trailing_crlf_only() {
        let input = lines(&["  - a.com\r"]);
        let out = extract_rule_lines(&input);
        // 前导空白保留，尾部 \r 去掉
        assert_eq!(out, vec!["  - a.com"]);
    }

    #[test]
    fn test_key_char_skips_prefix() {
        assert_eq!(key_char("- +.0.myikas.com"), '0');
        assert_eq!(key_char("- +.abc.com"), 'a');
        assert_eq!(key_char("- example.com"), 'e');
    }

    #[test]
    fn test_key_char_lowercases() {
        assert_eq!(key_char("- +.Zebra.com"), 'z');
    }

    #[test]
    fn test_key_char_empty_remainder() {
        assert_eq!(key_char("- +."), EMPTY_KEY);
        assert_eq!(key_char("-"), EMPTY_KEY);
    }

    #[test]
    fn test_bucket_classify() {
        assert_eq!(Bucket::classify('0'), Bucket::Digit);
        assert_eq!(Bucket::classify('9'), Bucket::Digit);
        assert_eq!(Bucket::classify('a'), Bucket::Alpha);
        assert_eq!(Bucket::classify('z'), Bucket::Alpha);
        assert_eq!(Bucket::classify('#'), Bucket::Other);
        assert_eq!(Bucket::classify(EMPTY_KEY), Bucket::Other);
        assert_eq!(Bucket::classify('中'), Bucket::Other);
    }
}
