use crate::models::edit::EditScript;
use crate::parser::DraftInput;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 从文件加载的草稿
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    /// 文件中记录的会话ID（仅 TOML 快照有）
    pub session_id: Option<String>,
    pub input: DraftInput,
}

/// TOML 快照格式
#[derive(Debug, Deserialize)]
struct TomlSnapshot {
    session_id: Option<String>,
    survey_draft: String,
}

/// 加载草稿文件
///
/// - `.txt` / `.md`：纯文本
/// - `.json`：任意 JSON 值，按边界规则渲染
/// - `.toml`：`session_id` + `survey_draft` 快照
pub async fn load_draft_file(path: &Path) -> Result<DraftSnapshot> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取草稿文件: {}", path.display()))?;

    parse_draft_file(path, &content)
}

/// 按扩展名解析已读入的文件内容
pub fn parse_draft_file(path: &Path, content: &str) -> Result<DraftSnapshot> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" | "" => Ok(DraftSnapshot {
            session_id: None,
            input: DraftInput::Text(content.to_string()),
        }),
        "json" => {
            let value: serde_json::Value = serde_json::from_str(content)
                .with_context(|| format!("无法解析JSON草稿: {}", path.display()))?;
            Ok(DraftSnapshot {
                session_id: None,
                input: DraftInput::from(value),
            })
        }
        "toml" => {
            let snapshot: TomlSnapshot = toml::from_str(content)
                .with_context(|| format!("无法解析TOML快照: {}", path.display()))?;
            Ok(DraftSnapshot {
                session_id: snapshot.session_id.filter(|s| !s.trim().is_empty()),
                input: DraftInput::Text(snapshot.survey_draft),
            })
        }
        other => anyhow::bail!("不支持的草稿文件格式 .{}: {}", other, path.display()),
    }
}

/// 加载编辑脚本
pub async fn load_edit_script(path: &Path) -> Result<EditScript> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取编辑脚本: {}", path.display()))?;

    let script: EditScript = toml::from_str(&content)
        .with_context(|| format!("无法解析编辑脚本: {}", path.display()))?;

    tracing::info!("加载了 {} 个编辑操作", script.edits.len());
    Ok(script)
}
