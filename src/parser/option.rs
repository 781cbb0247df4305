//! 选项提取
//!
//! 对已知属于当前题目的行，按优先级尝试各种选项标记并清理文本

use super::patterns::{
    circled_index, collapse_whitespace, strip_leading_bullet, strip_type_tokens, BRANCH_ARROW,
    BULLET_OPTION_RE, CIRCLED_OPTION_RE, CIRCLE_OPTION_RE, DASH_FALLBACK_OPTION_RE,
    NUMBERED_OPTION_RE, PAREN_INDEX_OPTION_RE,
};

/// 选项标记种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// ①–⑫
    Circled(usize),
    /// ○ / ● 通用圆点
    Circle,
    /// "(3) 文本"
    Parenthesized(usize),
    /// "- 文本" / "• 文本"
    Bullet,
    /// "3. 文本" / "3) 文本"，仅在不构成题目边界时成立
    Numbered(usize),
    /// 以 "-" 开头的兜底形式，可能夹带圆圈数字
    DashFallback,
}

/// 匹配选项标记，返回种类和未清理的文本
pub fn match_marker(line: &str) -> Option<(OptionKind, &str)> {
    let line = line.trim();

    if let Some(caps) = CIRCLED_OPTION_RE.captures(line) {
        let index = caps
            .get(1)
            .and_then(|m| m.as_str().chars().next())
            .and_then(circled_index)
            .unwrap_or(0);
        if let Some(text) = caps.get(2) {
            return Some((OptionKind::Circled(index), text.as_str()));
        }
    }

    if let Some(text) = CIRCLE_OPTION_RE.captures(line).and_then(|c| c.get(1)) {
        return Some((OptionKind::Circle, text.as_str()));
    }

    if let Some(caps) = PAREN_INDEX_OPTION_RE.captures(line) {
        let index = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        if let Some(text) = caps.get(2) {
            return Some((OptionKind::Parenthesized(index), text.as_str()));
        }
    }

    if let Some(text) = BULLET_OPTION_RE.captures(line).and_then(|c| c.get(1)) {
        return Some((OptionKind::Bullet, text.as_str()));
    }

    if let Some(caps) = NUMBERED_OPTION_RE.captures(line) {
        let index = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        if let Some(text) = caps.get(2) {
            return Some((OptionKind::Numbered(index), text.as_str()));
        }
    }

    DASH_FALLBACK_OPTION_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|text| (OptionKind::DashFallback, text.as_str()))
}

/// 清理选项文本
///
/// 去掉分支箭头之后的内容、行内题型代码、开头残留的项目符号
pub fn clean_option_text(raw: &str) -> String {
    let before_arrow = raw.split(BRANCH_ARROW).next().unwrap_or_default();
    let without_type = strip_type_tokens(before_arrow);
    collapse_whitespace(strip_leading_bullet(&without_type))
}

/// 提取并清理选项，无法提取或清理后为空时返回 None
pub fn extract_option(line: &str) -> Option<(OptionKind, String)> {
    let (kind, raw) = match_marker(line)?;
    let text = clean_option_text(raw);
    (!text.is_empty()).then_some((kind, text))
}
