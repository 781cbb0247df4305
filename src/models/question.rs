use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 题目标识
///
/// 解析时分配，不由内容派生，重新解析会得到新的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(Uuid);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 题型代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionType {
    /// 单选
    #[default]
    #[serde(rename = "SC")]
    SingleChoice,
    /// 多选
    #[serde(rename = "MA")]
    MultipleAnswer,
    /// 开放式作答
    #[serde(rename = "OQ")]
    OpenQuestion,
    /// 量表
    #[serde(rename = "RS")]
    RatingScale,
    /// 二分
    #[serde(rename = "DC")]
    Dichotomous,
    /// 排序
    #[serde(rename = "RK")]
    Ranking,
    /// 矩阵（没有独立的结构表示）
    #[serde(rename = "MG")]
    MatrixGrid,
}

impl QuestionType {
    /// 获取两位代码
    pub fn code(self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "SC",
            QuestionType::MultipleAnswer => "MA",
            QuestionType::OpenQuestion => "OQ",
            QuestionType::RatingScale => "RS",
            QuestionType::Dichotomous => "DC",
            QuestionType::Ranking => "RK",
            QuestionType::MatrixGrid => "MG",
        }
    }

    /// 从代码解析题型
    pub fn from_code(code: &str) -> Option<Self> {
        crate::parser::patterns::TYPE_CODES.get(code).copied()
    }

    pub fn is_open(self) -> bool {
        self == QuestionType::OpenQuestion
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or_else(|| format!("未知题型代码: {}", s))
    }
}

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// 源文本中的编号，可能带有 "-"，不保证唯一或连续
    pub number: String,
    /// 已清理的显示文本
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// 题型代码后括号中的数字，如 RS(7)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default)]
    pub options: Vec<String>,
    pub is_open: bool,
}

impl Question {
    pub fn new(number: impl Into<String>, text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: QuestionId::new(),
            number: number.into(),
            text: text.into(),
            question_type,
            scale: None,
            options: Vec::new(),
            is_open: question_type.is_open(),
        }
    }
}

/// 题目分组（显示窗口）
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionGroup<'a> {
    /// 在渲染序列中的起始位置（从1开始）
    pub start_num: usize,
    /// 在渲染序列中的结束位置（包含）
    pub end_num: usize,
    pub questions: &'a [Question],
    pub is_expanded: bool,
}

impl QuestionGroup<'_> {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
