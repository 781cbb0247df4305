use serde::Deserialize;

/// 编辑脚本中的单个操作
///
/// 脚本面向人工编写，`question`、`option`、`group` 均从 1 开始计数
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// 替换题干
    SetText { question: usize, text: String },
    /// 替换某个选项
    SetOption {
        question: usize,
        option: usize,
        text: String,
    },
    /// 追加占位选项
    AddOption { question: usize },
    /// 删除某个选项
    RemoveOption { question: usize, option: usize },
    /// 切换分组展开状态
    ToggleGroup { group: usize },
}

/// 编辑脚本
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditScript {
    #[serde(default)]
    pub edits: Vec<EditOp>,
}
