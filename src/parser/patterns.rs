//! 模式表
//!
//! 题目边界、选项标记、题型代码的正则与字形集合，全部只编译一次

use crate::models::question::QuestionType;
use phf::phf_map;
use regex::Regex;
use std::sync::LazyLock;

/// 圆圈数字 ①–⑫，序列化与解析共用
pub const CIRCLED_NUMERALS: [char; 12] = [
    '①', '②', '③', '④', '⑤', '⑥', '⑦', '⑧', '⑨', '⑩', '⑪', '⑫',
];

/// 题目边界关键字
pub const QUESTION_KEYWORD: &str = "문항";

/// 开放式作答关键字
pub const OPEN_KEYWORD: &str = "주관식";

/// 分支跳转箭头，之后的内容是条件跳转说明
pub const BRANCH_ARROW: char = '→';

/// 题型代码表
pub static TYPE_CODES: phf::Map<&'static str, QuestionType> = phf_map! {
    "SC" => QuestionType::SingleChoice,
    "MA" => QuestionType::MultipleAnswer,
    "OQ" => QuestionType::OpenQuestion,
    "RS" => QuestionType::RatingScale,
    "DC" => QuestionType::Dichotomous,
    "RK" => QuestionType::Ranking,
    "MG" => QuestionType::MatrixGrid,
};

// ========== 题目边界 ==========

/// "문항 N." / "문항 N-M:" / "**문항 N)**"
pub static QUESTION_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s*#]*문항\s*(\d+(?:-\d+)?)\s*[.:)．]\s*(.*)$").expect("invalid keyword pattern")
});

/// "Q1." / "Q3-1:"
pub static QUESTION_LETTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s*#]*Q(\d+(?:-\d+)?)\s*[.:)．]\s*(.*)$").expect("invalid letter pattern")
});

// ========== 选项标记（按优先级） ==========

pub static CIRCLED_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([①-⑫])\s*(.+)$").expect("invalid circled pattern"));

pub static CIRCLE_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[○●◯]\s*(.+)$").expect("invalid circle pattern"));

pub static PAREN_INDEX_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\s*(\d+)\s*\)\s*(.+)$").expect("invalid paren pattern"));

pub static BULLET_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-–•·▪]\s+(.+)$").expect("invalid bullet pattern"));

pub static NUMBERED_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[.)]\s*(.+)$").expect("invalid numbered pattern"));

pub static DASH_FALLBACK_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s*[①-⑫]?\s*(.+)$").expect("invalid dash pattern"));

// ========== 清理 ==========

static TYPE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(SC|MA|OQ|RS|DC|RK|MG)(?:\s*\(\s*(\d+)\s*\))?").expect("invalid type pattern")
});

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*+|_{2,}").expect("invalid emphasis pattern"));

static BRACKET_ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|【[^】]*】").expect("invalid bracket pattern"));

static LEADING_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r"^\s*(?:[①-⑫○●◯•·▪]\s*|[-–]\s+|[-–][①-⑫○●◯]\s*)+")
            .expect("invalid leading bullet pattern")
    });

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace pattern"));

/// 行内出现的题型代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeToken {
    pub question_type: QuestionType,
    pub scale: Option<u32>,
    /// 字节范围，包含外层括号（如有）
    pub start: usize,
    pub end: usize,
}

/// 查找行内所有独立的题型代码
///
/// 代码两侧不能紧邻 ASCII 字母或数字，避免误匹配 "SCORE"、"MAX" 等单词
pub fn type_tokens(text: &str) -> Vec<TypeToken> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();

    for caps in TYPE_TOKEN_RE.captures_iter(text) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let before_ok = code.start() == 0 || !bytes[code.start() - 1].is_ascii_alphanumeric();
        let after_ok = code.end() == bytes.len() || !bytes[code.end()].is_ascii_alphanumeric();
        if !before_ok || !after_ok {
            continue;
        }
        let Some(question_type) = TYPE_CODES.get(code.as_str()).copied() else {
            continue;
        };
        let scale = caps.get(2).and_then(|m| m.as_str().parse().ok());

        let (start, end) = widen_to_parens(text, whole.start(), whole.end());
        tokens.push(TypeToken {
            question_type,
            scale,
            start,
            end,
        });
    }

    tokens
}

/// 行内第一个题型代码
pub fn find_type_token(text: &str) -> Option<TypeToken> {
    type_tokens(text).into_iter().next()
}

/// "(SC)" / "( RS(7) )" 连同括号一起去掉
fn widen_to_parens(text: &str, start: usize, end: usize) -> (usize, usize) {
    let head = text[..start].trim_end();
    let tail = text[end..].trim_start();
    if head.ends_with('(') && tail.starts_with(')') {
        let new_start = head.len() - 1;
        let new_end = text.len() - tail.len() + 1;
        (new_start, new_end)
    } else {
        (start, end)
    }
}

/// 去掉行内所有题型代码
pub fn strip_type_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for token in type_tokens(text) {
        if token.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..token.start]);
        cursor = token.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// 去掉开头残留的项目符号
///
/// 短横线后面必须跟空白或圆圈字形才算符号，"-10도" 中的负号保留
pub fn strip_leading_bullet(text: &str) -> &str {
    match LEADING_BULLET_RE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// 题干清理：强调符号、方括号注释、题型代码
pub fn clean_question_text(text: &str) -> String {
    let text = EMPHASIS_RE.replace_all(text, "");
    let text = BRACKET_ANNOTATION_RE.replace_all(&text, "");
    let text = strip_type_tokens(&text);
    collapse_whitespace(&text)
}

/// 圆圈数字对应的序号（1–12）
pub fn circled_index(glyph: char) -> Option<usize> {
    CIRCLED_NUMERALS.iter().position(|&c| c == glyph).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_type_token_with_scale() {
        let token = find_type_token("만족도 RS(7)").unwrap();
        assert_eq!(token.question_type, QuestionType::RatingScale);
        assert_eq!(token.scale, Some(7));
    }

    #[test]
    fn test_type_token_ignores_words() {
        assert!(find_type_token("SCORE 와 MAX 값").is_none());
        assert!(find_type_token("Q1. 질문").is_none());
    }

    #[test]
    fn test_type_token_after_hangul() {
        let token = find_type_token("의견OQ").unwrap();
        assert_eq!(token.question_type, QuestionType::OpenQuestion);
    }

    #[test]
    fn test_strip_type_tokens_removes_parens() {
        assert_eq!(strip_type_tokens("만족하십니까? (SC)").trim(), "만족하십니까?");
        assert_eq!(strip_type_tokens("만족도(RS(10))"), "만족도");
        assert_eq!(strip_type_tokens("(예/아니오)"), "(예/아니오)");
    }

    #[test]
    fn test_clean_question_text() {
        assert_eq!(
            clean_question_text("**귀하의 성별은?** [필수]  (SC)"),
            "귀하의 성별은?"
        );
        assert_eq!(clean_question_text("__나이__ 【인구】 RS(5)"), "나이");
    }

    #[test]
    fn test_strip_leading_bullet() {
        assert_eq!(strip_leading_bullet("① 예"), "예");
        assert_eq!(strip_leading_bullet("• - 아니오"), "아니오");
        assert_eq!(strip_leading_bullet("보통"), "보통");
        assert_eq!(strip_leading_bullet("-10도 이하"), "-10도 이하");
        assert_eq!(strip_leading_bullet("–5점"), "–5점");
        assert_eq!(strip_leading_bullet("-① 예"), "예");
    }

    #[test]
    fn test_circled_index() {
        assert_eq!(circled_index('①'), Some(1));
        assert_eq!(circled_index('⑫'), Some(12));
        assert_eq!(circled_index('a'), None);
    }
}
