//! 草稿解析
//!
//! 原始草稿文本 → 预处理 → 行分类 → 题目组装（含选项提取） → 题目序列
//!
//! 解析从不报错：无法识别的行被跳过，空文本得到空序列

pub mod assembler;
pub mod classifier;
pub mod normalize;
pub mod option;
pub mod patterns;

pub use assembler::{assemble, QuestionAssembler};
pub use classifier::{classify_line, tokenize, LineKind};
pub use normalize::{normalize_draft, DraftInput};
pub use option::{extract_option, OptionKind};

use crate::models::question::Question;
use tracing::debug;

/// 解析草稿文本
pub fn parse_draft(text: &str) -> Vec<Question> {
    let normalized = normalize_draft(text);
    let questions = assemble(tokenize(&normalized));
    debug!("解析草稿: {} 字符 → {} 道题目", text.chars().count(), questions.len());
    questions
}

/// 解析任意形式的草稿输入
pub fn parse_input(input: &DraftInput) -> Vec<Question> {
    parse_draft(&input.to_text())
}
