//! 编辑存储 - 流程层
//!
//! 持有可编辑的题目序列，是模型的唯一所有者：
//! - 单一题目集合，分组视图按需投影，不存在两份需要同步的副本
//! - 每次编辑都生成新的题目列表（结构替换），成功后置脏标志
//! - 保存时序列化为规范文本，依次写入草稿字段和最终字段
//! - 上游文本变化时按显式策略处理本地未保存的修改

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{AppResult, EditError};
use crate::infrastructure::{DraftField, ExportFormat, ExportedDocument, SurveyBackend};
use crate::models::edit::EditOp;
use crate::models::question::{Question, QuestionGroup, QuestionId};
use crate::parser::option::clean_option_text;
use crate::parser::{parse_draft, DraftInput};
use crate::services::{paginate, serialize, GroupExpansion};

/// 新增选项的占位文本
pub const NEW_OPTION_PLACEHOLDER: &str = "새 보기";

/// 保存时按顺序写入的字段
const SAVE_FIELDS: [DraftField; 2] = [DraftField::Draft, DraftField::Final];

/// 上游草稿变化时如何处理本地未保存的修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// 重新解析并丢弃本地修改
    #[default]
    Overwrite,
    /// 重新解析，按位置保留被编辑过的题目
    Merge,
    /// 有未保存修改时拒绝更新
    Reject,
}

impl FromStr for ReconcilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(ReconcilePolicy::Overwrite),
            "merge" => Ok(ReconcilePolicy::Merge),
            "reject" => Ok(ReconcilePolicy::Reject),
            other => Err(format!("未知的同步策略: {}", other)),
        }
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcilePolicy::Overwrite => "overwrite",
            ReconcilePolicy::Merge => "merge",
            ReconcilePolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// 加载上游草稿的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// 与上次的上游文本相同，未重新解析
    Unchanged,
    /// 重新解析并整体替换
    Replaced { discarded_edits: bool },
    /// 重新解析，并保留了若干道本地编辑过的题目
    Merged { carried: usize },
}

/// 保存结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 没有未保存的修改
    Clean,
    /// 已保存，`attempts` 为整批发送的次数
    Saved { attempts: u32 },
}

/// 编辑存储
pub struct SurveyStore {
    backend: Arc<dyn SurveyBackend>,
    session_id: Option<String>,
    questions: Vec<Question>,
    expansion: GroupExpansion,
    dirty: bool,
    edited: HashSet<QuestionId>,
    upstream: Option<String>,
    save_retries: u32,
}

impl SurveyStore {
    /// 创建空的编辑存储
    pub fn new(backend: Arc<dyn SurveyBackend>) -> Self {
        Self {
            backend,
            session_id: None,
            questions: Vec::new(),
            expansion: GroupExpansion::for_total(0),
            dirty: false,
            edited: HashSet::new(),
            upstream: None,
            save_retries: 0,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// 保存失败时整批重发的次数，默认 0
    pub fn with_save_retries(mut self, retries: u32) -> Self {
        self.save_retries = retries;
        self
    }

    // ========== 查询 ==========

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// 按渲染位置（从1开始）取题目标识
    pub fn question_id_at(&self, position: usize) -> Result<QuestionId, EditError> {
        position
            .checked_sub(1)
            .and_then(|i| self.questions.get(i))
            .map(|q| q.id)
            .ok_or(EditError::PositionOutOfRange {
                position,
                total: self.questions.len(),
            })
    }

    /// 分组视图，由当前题目序列即时投影
    pub fn groups(&self) -> Vec<QuestionGroup<'_>> {
        paginate(&self.questions, &self.expansion)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
    }

    /// 最近一次加载或保存的上游文本
    pub fn upstream_text(&self) -> Option<&str> {
        self.upstream.as_deref()
    }

    /// 当前模型的规范文本
    pub fn canonical_text(&self) -> String {
        serialize(&self.questions)
    }

    // ========== 上游同步 ==========

    /// 从上游草稿重新派生题目序列
    pub fn load_draft(
        &mut self,
        input: &DraftInput,
        policy: ReconcilePolicy,
    ) -> AppResult<ReconcileOutcome> {
        let text = input.to_text();
        if self.upstream.as_deref() == Some(text.as_str()) {
            debug!("上游草稿未变化，跳过重新解析");
            return Ok(ReconcileOutcome::Unchanged);
        }

        let parsed = parse_draft(&text);
        info!(
            "📋 解析上游草稿: {} 道题目 (策略: {})",
            parsed.len(),
            policy
        );

        match policy {
            ReconcilePolicy::Reject if self.dirty => {
                warn!("⚠️ 存在未保存的修改，拒绝用上游草稿覆盖");
                Err(EditError::UnsavedEdits.into())
            }
            ReconcilePolicy::Merge if self.dirty => {
                let carried = self.merge(parsed, text);
                Ok(ReconcileOutcome::Merged { carried })
            }
            _ => {
                let discarded_edits = self.dirty;
                if discarded_edits {
                    warn!(
                        "⚠️ 上游草稿已更新，丢弃 {} 道题目上未保存的修改",
                        self.edited.len()
                    );
                }
                self.replace(parsed, text);
                Ok(ReconcileOutcome::Replaced { discarded_edits })
            }
        }
    }

    fn replace(&mut self, questions: Vec<Question>, upstream: String) {
        self.expansion = GroupExpansion::for_total(questions.len());
        self.questions = questions;
        self.dirty = false;
        self.edited.clear();
        self.upstream = Some(upstream);
    }

    /// 被编辑过的题目按位置覆盖新解析结果中的同位置题目
    fn merge(&mut self, mut parsed: Vec<Question>, upstream: String) -> usize {
        let mut carried = HashSet::new();
        for (position, local) in self.questions.iter().enumerate() {
            if !self.edited.contains(&local.id) {
                continue;
            }
            if let Some(slot) = parsed.get_mut(position) {
                *slot = local.clone();
                carried.insert(local.id);
            }
        }

        info!("🔀 合并上游草稿，保留 {} 道本地编辑过的题目", carried.len());

        if self.expansion.len() != GroupExpansion::for_total(parsed.len()).len() {
            self.expansion = GroupExpansion::for_total(parsed.len());
        }
        self.questions = parsed;
        self.dirty = !carried.is_empty();
        let count = carried.len();
        self.edited = carried;
        self.upstream = Some(upstream);
        count
    }

    // ========== 编辑 ==========

    /// 替换题干
    pub fn update_question_text(&mut self, id: QuestionId, text: impl Into<String>) -> AppResult<()> {
        let text = text.into();
        self.replace_question(id, |q| {
            Ok(Question {
                text,
                ..q.clone()
            })
        })
    }

    /// 替换某个选项（索引从0开始）
    ///
    /// 清理后为空的文本会被拒绝，否则重新解析时该选项会消失
    pub fn update_option(
        &mut self,
        id: QuestionId,
        index: usize,
        text: impl Into<String>,
    ) -> AppResult<()> {
        let text = text.into();
        self.replace_question(id, |q| {
            check_option_index(q, index)?;
            if clean_option_text(&text).is_empty() {
                return Err(EditError::BlankOption { index });
            }
            let mut options = q.options.clone();
            options[index] = text;
            Ok(Question {
                options,
                ..q.clone()
            })
        })
    }

    /// 追加一个占位选项
    pub fn add_option(&mut self, id: QuestionId) -> AppResult<()> {
        self.replace_question(id, |q| {
            let mut options = q.options.clone();
            options.push(NEW_OPTION_PLACEHOLDER.to_string());
            Ok(Question {
                options,
                ..q.clone()
            })
        })
    }

    /// 删除某个选项（索引从0开始），其余选项保持相对顺序
    pub fn remove_option(&mut self, id: QuestionId, index: usize) -> AppResult<()> {
        self.replace_question(id, |q| {
            check_option_index(q, index)?;
            let options = q
                .options
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != index)
                .map(|(_, o)| o.clone())
                .collect();
            Ok(Question {
                options,
                ..q.clone()
            })
        })
    }

    /// 切换分组展开状态，不影响脏标志
    pub fn toggle_group(&mut self, index: usize) -> AppResult<bool> {
        let len = self.expansion.len();
        self.expansion
            .toggle(index)
            .ok_or_else(|| EditError::GroupOutOfRange { index, len }.into())
    }

    /// 执行编辑脚本中的操作（位置从1开始）
    pub fn apply(&mut self, op: &EditOp) -> AppResult<()> {
        match op {
            EditOp::SetText { question, text } => {
                let id = self.question_id_at(*question)?;
                self.update_question_text(id, text.clone())
            }
            EditOp::SetOption {
                question,
                option,
                text,
            } => {
                let id = self.question_id_at(*question)?;
                self.update_option(id, one_based(*option)?, text.clone())
            }
            EditOp::AddOption { question } => {
                let id = self.question_id_at(*question)?;
                self.add_option(id)
            }
            EditOp::RemoveOption { question, option } => {
                let id = self.question_id_at(*question)?;
                self.remove_option(id, one_based(*option)?)
            }
            EditOp::ToggleGroup { group } => {
                let len = self.expansion.len();
                let index = group
                    .checked_sub(1)
                    .ok_or(EditError::GroupOutOfRange { index: 0, len })?;
                self.toggle_group(index).map(|_| ())
            }
        }
    }

    fn replace_question<F>(&mut self, id: QuestionId, edit: F) -> AppResult<()>
    where
        F: FnOnce(&Question) -> Result<Question, EditError>,
    {
        let position = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| EditError::QuestionNotFound { id: id.to_string() })?;

        let updated = edit(&self.questions[position])?;
        let mut next = self.questions.clone();
        next[position] = updated;
        self.questions = next;

        self.dirty = true;
        self.edited.insert(id);
        debug!("编辑题目 {} (位置 {})", id, position + 1);
        Ok(())
    }

    // ========== 保存与导出 ==========

    /// 保存当前模型
    ///
    /// 两个字段作为一批依次写入；任一失败时脏标志保持不变，
    /// 整批最多重发 `save_retries` 次
    pub async fn save(&mut self) -> AppResult<SaveOutcome> {
        if !self.dirty {
            debug!("没有未保存的修改");
            return Ok(SaveOutcome::Clean);
        }
        let session_id = self.session_id.clone().ok_or(EditError::NoSession)?;

        let text = self.canonical_text();
        let attempts = self.persist_batch(&session_id, &text).await?;

        self.dirty = false;
        self.edited.clear();
        self.upstream = Some(text);
        info!("💾 已保存 {} 道题目 (会话 {})", self.questions.len(), session_id);

        Ok(SaveOutcome::Saved { attempts })
    }

    async fn persist_batch(&self, session_id: &str, text: &str) -> AppResult<u32> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.persist_fields(session_id, text).await {
                Ok(()) => return Ok(attempt),
                Err(e) if attempt <= self.save_retries => {
                    warn!("⚠️ 第 {} 次保存失败，整批重发: {}", attempt, e);
                }
                Err(e) => {
                    error!("❌ 保存失败，修改仍未保存: {}", e);
                    return Err(e);
                }
            }
        }
    }

    async fn persist_fields(&self, session_id: &str, text: &str) -> AppResult<()> {
        for field in SAVE_FIELDS {
            self.backend.persist(session_id, field, text).await?;
        }
        Ok(())
    }

    /// 导出文件，有未保存修改时先保存
    ///
    /// 保存失败则不导出；导出失败不会回滚已完成的保存
    pub async fn export(&mut self, format: ExportFormat) -> AppResult<ExportedDocument> {
        if self.dirty {
            self.save().await?;
        }
        let session_id = self.session_id.as_deref().ok_or(EditError::NoSession)?;

        info!("📤 请求导出 {} (会话 {})", format, session_id);
        let document = self.backend.export_document(session_id, format).await?;
        info!("✓ 导出完成: {} ({} 字节)", document.file_name, document.bytes.len());
        Ok(document)
    }
}

fn check_option_index(question: &Question, index: usize) -> Result<(), EditError> {
    if index < question.options.len() {
        Ok(())
    } else {
        Err(EditError::OptionOutOfRange {
            index,
            len: question.options.len(),
        })
    }
}

fn one_based(option: usize) -> Result<usize, EditError> {
    option
        .checked_sub(1)
        .ok_or(EditError::OptionOutOfRange { index: 0, len: 0 })
}
