//! 题目组装
//!
//! 顺序消费已分类的行，输出题目序列。状态只有两个：
//! 没有当前题目 / 正在累积当前题目

use super::classifier::LineKind;
use super::patterns::{clean_question_text, find_type_token, OPEN_KEYWORD};
use crate::models::question::Question;
use tracing::debug;

#[derive(Debug, Default)]
enum AssemblerState {
    #[default]
    Idle,
    Accumulating(Question),
}

/// 题目组装器
#[derive(Debug, Default)]
pub struct QuestionAssembler {
    state: AssemblerState,
    output: Vec<Question>,
    dropped_lines: usize,
}

impl QuestionAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 消费一行
    pub fn feed(&mut self, line: LineKind) {
        match line {
            LineKind::Blank => {}
            LineKind::QuestionBoundary {
                number,
                remainder,
                raw,
            } => {
                self.flush();
                self.state = AssemblerState::Accumulating(start_question(number, &remainder, &raw));
            }
            LineKind::OptionMarker { text, .. } => match &mut self.state {
                // 开放式题目后的选项同样保留
                AssemblerState::Accumulating(question) => question.options.push(text),
                AssemblerState::Idle => self.dropped_lines += 1,
            },
            LineKind::PlainText(_) => self.dropped_lines += 1,
        }
    }

    /// 结束输入，输出全部题目
    pub fn finish(mut self) -> Vec<Question> {
        self.flush();
        if self.dropped_lines > 0 {
            debug!("组装完成，丢弃了 {} 行无法识别的内容", self.dropped_lines);
        }
        self.output
    }

    fn flush(&mut self) {
        if let AssemblerState::Accumulating(question) = std::mem::take(&mut self.state) {
            self.output.push(question);
        }
    }
}

fn start_question(number: String, remainder: &str, raw: &str) -> Question {
    let token = find_type_token(raw);
    let question_type = token.map(|t| t.question_type).unwrap_or_default();

    Question {
        scale: token.and_then(|t| t.scale),
        is_open: question_type.is_open() || raw.contains(OPEN_KEYWORD),
        ..Question::new(number, clean_question_text(remainder), question_type)
    }
}

/// 组装整段行序列
pub fn assemble(lines: impl IntoIterator<Item = LineKind>) -> Vec<Question> {
    let mut assembler = QuestionAssembler::new();
    for line in lines {
        assembler.feed(line);
    }
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;
    use crate::parser::classifier::tokenize;

    #[test]
    fn test_lines_before_first_question_are_ignored() {
        let questions = assemble(tokenize("설문 안내\n① 떠도는 보기\n문항 1. 질문 (SC)"));
        assert_eq!(questions.len(), 1);
        assert!(questions[0].options.is_empty());
    }

    #[test]
    fn test_question_without_content_is_valid() {
        let questions = assemble(tokenize("문항 1. 첫 질문\n문항 2. 두번째 (MA)"));
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_type, QuestionType::SingleChoice);
        assert_eq!(questions[1].question_type, QuestionType::MultipleAnswer);
        assert!(questions.iter().all(|q| q.options.is_empty()));
    }

    #[test]
    fn test_open_keyword_marks_open() {
        let questions = assemble(tokenize("Q1. 기타 의견 (주관식)"));
        assert!(questions[0].is_open);
        assert_eq!(questions[0].question_type, QuestionType::SingleChoice);
    }

    #[test]
    fn test_bracketed_open_keyword_marks_open() {
        let questions = assemble(tokenize("문항 1. 기타 의견 [주관식]"));
        assert!(questions[0].is_open);
        assert_eq!(questions[0].text, "기타 의견");
    }

    #[test]
    fn test_options_after_open_marker_are_kept() {
        let questions = assemble(tokenize("문항 1. 의견 (OQ)\n① 있음"));
        assert!(questions[0].is_open);
        assert_eq!(questions[0].options, vec!["있음"]);
    }

    #[test]
    fn test_scale_is_captured() {
        let questions = assemble(tokenize("문항 4. 전반적 만족도 RS(7)"));
        assert_eq!(questions[0].question_type, QuestionType::RatingScale);
        assert_eq!(questions[0].scale, Some(7));
        assert_eq!(questions[0].text, "전반적 만족도");
    }

    #[test]
    fn test_plain_text_inside_block_is_dropped() {
        let questions = assemble(tokenize(
            "문항 1. 만족도 (RS)\n전혀 아니다     매우 그렇다\n① 1점\n② 2점",
        ));
        assert_eq!(questions[0].options, vec!["1점", "2점"]);
    }
}
