//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，串起一次完整的处理：
//!
//! 1. **加载草稿**：本地草稿文件优先，否则按会话ID从后端拉取
//! 2. **解析同步**：交给 `SurveyStore` 按同步策略派生题目序列
//! 3. **应用编辑**：执行编辑脚本，写出规范化文本
//! 4. **保存**：有会话且有未保存修改时整批保存
//! 5. **导出**：配置了导出格式时下载文件到导出目录
//!
//! 编排层只做调度和统计，编辑语义都在 `workflow::store` 中

use crate::config::Config;
use crate::infrastructure::{ExportFormat, SurveyApiClient, SurveyBackend};
use crate::models::{load_draft_file, load_edit_script, DraftSnapshot};
use crate::parser::DraftInput;
use crate::utils::logging::{self, RunSummary};
use crate::workflow::{SaveOutcome, SurveyStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    backend: Arc<dyn SurveyBackend>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let backend = SurveyApiClient::new(&config).context("无法创建问卷后端客户端")?;
        Self::with_backend(config, Arc::new(backend))
    }

    /// 使用指定后端初始化应用
    pub fn with_backend(config: Config, backend: Arc<dyn SurveyBackend>) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法初始化日志文件: {}", config.output_log_file))?;
        logging::log_startup(&config);

        Ok(Self { config, backend })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let Some(snapshot) = self.load_snapshot().await? else {
            warn!("⚠️ 没有可处理的草稿，程序结束");
            return Ok(summary);
        };

        let mut store = SurveyStore::new(self.backend.clone())
            .with_save_retries(self.config.save_retries);
        if let Some(session_id) = snapshot.session_id.as_ref().or(self.config.session_id.as_ref()) {
            store.set_session_id(session_id.clone());
        }

        store
            .load_draft(&snapshot.input, self.config.reconcile_policy)
            .context("无法加载草稿")?;
        summary.questions = store.questions().len();
        info!("✓ 解析得到 {} 道题目", summary.questions);
        logging::log_groups(&store.groups());

        summary.edits_applied = self.apply_edits(&mut store).await?;
        self.write_canonical(&store).await?;

        if store.session_id().is_none() {
            if store.is_dirty() {
                warn!("⚠️ 未设置会话ID，修改只写入本地输出，不会保存到后端");
            }
        } else {
            summary.saved = matches!(
                store.save().await.context("保存问卷失败")?,
                SaveOutcome::Saved { .. }
            );
            if let Some(format) = self.config.export_format {
                // 已完成的保存保留，导出失败只记录
                match self.export(&mut store, format).await {
                    Ok(path) => summary.exported = Some(path.display().to_string()),
                    Err(e) => error!("❌ 导出失败 (已保存: {}): {:#}", summary.saved, e),
                }
            }
        }

        logging::print_final_stats(&summary, &self.config.output_log_file);
        Ok(summary)
    }

    /// 读取草稿：本地文件优先，其次后端会话
    async fn load_snapshot(&self) -> Result<Option<DraftSnapshot>> {
        if let Some(path) = &self.config.draft_file {
            info!("\n📁 正在读取草稿文件: {}", path);
            return load_draft_file(Path::new(path)).await.map(Some);
        }

        let Some(session_id) = &self.config.session_id else {
            return Ok(None);
        };

        info!("\n🌐 正在从后端拉取会话 {} 的问卷", session_id);
        let value = self
            .backend
            .fetch_draft(session_id)
            .await
            .with_context(|| format!("无法读取会话状态: {}", session_id))?;

        Ok(value.map(|value| DraftSnapshot {
            session_id: Some(session_id.clone()),
            input: DraftInput::from(value),
        }))
    }

    /// 执行编辑脚本，返回成功应用的操作数
    ///
    /// 单个操作失败只记录日志，不中断后续操作
    async fn apply_edits(&self, store: &mut SurveyStore) -> Result<usize> {
        let Some(path) = &self.config.edits_file else {
            return Ok(0);
        };

        let script = load_edit_script(Path::new(path)).await?;
        let mut applied = 0;
        for (index, op) in script.edits.iter().enumerate() {
            match store.apply(op) {
                Ok(()) => applied += 1,
                Err(e) => error!("[编辑 {}] ❌ {:?} 无法应用: {}", index + 1, op, e),
            }
        }

        info!("✏️ 编辑脚本: 成功 {}/{}", applied, script.edits.len());
        Ok(applied)
    }

    async fn write_canonical(&self, store: &SurveyStore) -> Result<()> {
        let Some(path) = &self.config.canonical_output_file else {
            return Ok(());
        };

        fs::write(path, store.canonical_text())
            .await
            .with_context(|| format!("无法写入规范化文本: {}", path))?;
        info!("📝 规范化文本已写入: {}", path);
        Ok(())
    }

    async fn export(&self, store: &mut SurveyStore, format: ExportFormat) -> Result<PathBuf> {
        let document = store.export(format).await.context("导出失败")?;

        let dir = Path::new(&self.config.export_dir);
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("无法创建导出目录: {}", dir.display()))?;

        let path = dir.join(&document.file_name);
        fs::write(&path, &document.bytes)
            .await
            .with_context(|| format!("无法写入导出文件: {}", path.display()))?;
        Ok(path)
    }
}
