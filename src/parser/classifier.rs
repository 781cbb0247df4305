//! 行分类
//!
//! 把草稿文本切分为带标签的行序列，分类与组装互不依赖

use super::option::{extract_option, OptionKind};
use super::patterns::{QUESTION_KEYWORD_RE, QUESTION_LETTER_RE};

/// 行类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// 新题目开始
    QuestionBoundary {
        /// 源文本中的编号，如 "3" 或 "3-1"
        number: String,
        /// 标记之后的剩余文本（未清理）
        remainder: String,
        /// 整行原文，用于题型和开放式关键字检测
        raw: String,
    },
    /// 选项行，文本已清理且非空
    OptionMarker { kind: OptionKind, text: String },
    /// 其他内容
    PlainText(String),
}

/// 只有两类标记能开始新题目，其余行要么是选项，要么被丢弃
pub fn match_boundary(line: &str) -> Option<(String, String)> {
    [&*QUESTION_KEYWORD_RE, &*QUESTION_LETTER_RE]
        .into_iter()
        .find_map(|re| re.captures(line))
        .and_then(|caps| {
            let number = caps.get(1)?.as_str().to_string();
            let remainder = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            Some((number, remainder.trim().to_string()))
        })
}

/// 对单行分类
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if let Some((number, remainder)) = match_boundary(trimmed) {
        return LineKind::QuestionBoundary {
            number,
            remainder,
            raw: trimmed.to_string(),
        };
    }

    match extract_option(trimmed) {
        Some((kind, text)) => LineKind::OptionMarker { kind, text },
        None => LineKind::PlainText(trimmed.to_string()),
    }
}

/// 对整段（已预处理的）文本逐行分类
pub fn tokenize(text: &str) -> Vec<LineKind> {
    text.lines().map(classify_line).collect()
}
