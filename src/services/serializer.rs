//! 规范化序列化 - 业务能力层
//!
//! 由当前（可能已编辑的）题目序列重新生成草稿文本。
//! 按当前位置重新编号，源编号被丢弃，不追求与原文逐字节一致

use crate::models::question::Question;
use crate::parser::patterns::{
    strip_leading_bullet, CIRCLED_NUMERALS, OPEN_KEYWORD, QUESTION_KEYWORD,
};

/// 开放式题目用来代替选项的固定行
pub const OPEN_PLACEHOLDER: &str = "(자유 응답)";

/// 选项前缀：前 12 个用圆圈数字，之后用 "(N)"
pub fn option_prefix(index: usize) -> String {
    match CIRCLED_NUMERALS.get(index) {
        Some(glyph) => glyph.to_string(),
        None => format!("({})", index + 1),
    }
}

/// 题目标题行，带边界关键字，保证输出可以被重新解析
///
/// 仅靠关键字判定为开放式的题目，标题中必须保留关键字
pub fn question_line(position: usize, question: &Question) -> String {
    let open_marker = if question.is_open
        && !question.question_type.is_open()
        && !question.text.contains(OPEN_KEYWORD)
    {
        format!(" ({})", OPEN_KEYWORD)
    } else {
        String::new()
    };

    match question.scale {
        Some(scale) => format!(
            "{} {}. {}{} ({}({}))",
            QUESTION_KEYWORD, position, question.text, open_marker, question.question_type, scale
        ),
        None => format!(
            "{} {}. {}{} ({})",
            QUESTION_KEYWORD, position, question.text, open_marker, question.question_type
        ),
    }
}

/// 序列化单个题目块（不含末尾空行）
pub fn serialize_question(position: usize, question: &Question) -> Vec<String> {
    let mut lines = vec![question_line(position, question)];

    if question.is_open {
        lines.push(OPEN_PLACEHOLDER.to_string());
    } else {
        lines.extend(question.options.iter().enumerate().map(|(i, option)| {
            format!("{} {}", option_prefix(i), strip_leading_bullet(option).trim())
        }));
    }

    lines
}

/// 序列化整个题目序列，每个题目块后跟一个空行
pub fn serialize(questions: &[Question]) -> String {
    let mut out = String::new();
    for (index, question) in questions.iter().enumerate() {
        for line in serialize_question(index + 1, question) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;

    fn question(text: &str, question_type: QuestionType, options: &[&str]) -> Question {
        Question {
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Question::new("1", text, question_type)
        }
    }

    #[test]
    fn test_renumbers_by_position() {
        let questions = vec![
            question("첫 질문", QuestionType::SingleChoice, &["예", "아니오"]),
            question("두번째", QuestionType::MultipleAnswer, &[]),
        ];
        assert_eq!(
            serialize(&questions),
            "문항 1. 첫 질문 (SC)\n① 예\n② 아니오\n\n문항 2. 두번째 (MA)\n\n"
        );
    }

    #[test]
    fn test_thirteen_options() {
        let mut question = question("많은 보기", QuestionType::MultipleAnswer, &[]);
        question.options = (1..=13).map(|i| format!("보기{}", i)).collect();
        let lines = serialize_question(1, &question);

        assert_eq!(lines.len(), 14);
        for (i, glyph) in CIRCLED_NUMERALS.iter().enumerate() {
            assert_eq!(lines[i + 1], format!("{} 보기{}", glyph, i + 1));
        }
        assert_eq!(lines[13], "(13) 보기13");
    }

    #[test]
    fn test_open_question_uses_placeholder() {
        let question = question("의견", QuestionType::OpenQuestion, &["무시됨"]);
        assert_eq!(
            serialize_question(1, &question),
            vec!["문항 1. 의견 (OQ)".to_string(), OPEN_PLACEHOLDER.to_string()]
        );
    }

    #[test]
    fn test_keyword_open_question_keeps_keyword() {
        let mut question = question("기타 의견", QuestionType::SingleChoice, &[]);
        question.is_open = true;
        assert_eq!(question_line(2, &question), "문항 2. 기타 의견 (주관식) (SC)");

        let mut question = self::question("기타 의견 (주관식)", QuestionType::SingleChoice, &[]);
        question.is_open = true;
        assert_eq!(question_line(2, &question), "문항 2. 기타 의견 (주관식) (SC)");
    }

    #[test]
    fn test_existing_bullet_is_not_doubled() {
        let question = question("질문", QuestionType::SingleChoice, &["① 예", "-10도"]);
        let lines = serialize_question(1, &question);
        assert_eq!(lines[1], "① 예");
        assert_eq!(lines[2], "② -10도");
    }

    #[test]
    fn test_scale_is_kept() {
        let mut question = question("만족도", QuestionType::RatingScale, &[]);
        question.scale = Some(7);
        assert_eq!(question_line(3, &question), "문항 3. 만족도 (RS(7))");
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(serialize(&[]), "");
    }
}
