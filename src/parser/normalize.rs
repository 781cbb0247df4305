//! 输入预处理
//!
//! - 上游可能给出字符串、类 JSON 数组字符串，或者非字符串的结构化值
//! - 结构化值先渲染为文本，数组字符串整体展开为多行

use serde_json::Value as JsonValue;

/// 草稿输入
#[derive(Debug, Clone, PartialEq)]
pub enum DraftInput {
    Text(String),
    Structured(JsonValue),
}

impl DraftInput {
    /// 渲染为文本
    ///
    /// 数组元素以换行连接（字符串元素原样，其他元素序列化为 JSON），
    /// 对象等其他值直接序列化为 JSON，null 视为空文本
    pub fn to_text(&self) -> String {
        match self {
            DraftInput::Text(text) => text.clone(),
            DraftInput::Structured(value) => render_value(value),
        }
    }
}

impl From<&str> for DraftInput {
    fn from(text: &str) -> Self {
        DraftInput::Text(text.to_string())
    }
}

impl From<String> for DraftInput {
    fn from(text: String) -> Self {
        DraftInput::Text(text)
    }
}

impl From<JsonValue> for DraftInput {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::String(text) => DraftInput::Text(text),
            other => DraftInput::Structured(other),
        }
    }
}

fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

/// 是否像序列化后的字符串数组
pub fn looks_like_array(text: &str) -> bool {
    text.contains("', '") || text.contains("\", \"")
}

/// 整段文本的预处理，只执行一次
///
/// 看起来像 `['..', '..']` 时去掉外层括号和引号，分隔符转为换行，
/// 并把字面量 `\n` 还原为换行
pub fn normalize_draft(text: &str) -> String {
    if !looks_like_array(text) {
        return text.to_string();
    }

    let trimmed = text.trim();
    let unbracketed = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let unbracketed = unbracketed.strip_suffix(']').unwrap_or(unbracketed);
    let body = strip_quotes(unbracketed.trim());

    body.replace("', '", "\n")
        .replace("\", \"", "\n")
        .replace("\\n", "\n")
}

fn strip_quotes(text: &str) -> &str {
    let text = text
        .strip_prefix(['\'', '"'])
        .unwrap_or(text);
    text.strip_suffix(['\'', '"']).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_is_untouched() {
        let text = "문항 1. 질문 (SC)\n① 예";
        assert_eq!(normalize_draft(text), text);
    }

    #[test]
    fn test_array_string_is_split_into_lines() {
        let text = "['문항 1. 질문 (SC)', '① 예', '② 아니오']";
        assert_eq!(normalize_draft(text), "문항 1. 질문 (SC)\n① 예\n② 아니오");
    }

    #[test]
    fn test_double_quoted_array_with_escaped_newlines() {
        let text = r#"["문항 1. 질문 (SC)\n① 예", "문항 2. 의견 (OQ)"]"#;
        assert_eq!(normalize_draft(text), "문항 1. 질문 (SC)\n① 예\n문항 2. 의견 (OQ)");
    }

    #[test]
    fn test_structured_array_joins_with_newlines() {
        let input = DraftInput::from(json!(["문항 1. 질문", "① 예", 3]));
        assert_eq!(input.to_text(), "문항 1. 질문\n① 예\n3");
    }

    #[test]
    fn test_structured_object_is_stringified() {
        let input = DraftInput::from(json!({"a": 1}));
        assert_eq!(input.to_text(), r#"{"a":1}"#);
        assert_eq!(DraftInput::from(JsonValue::Null).to_text(), "");
    }

    #[test]
    fn test_json_string_value_is_text() {
        assert_eq!(
            DraftInput::from(json!("문항 1. 질문")),
            DraftInput::Text("문항 1. 질문".to_string())
        );
    }
}
