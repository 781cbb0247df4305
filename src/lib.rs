//! # Survey Draft Editor
//!
//! 将自由格式的问卷草稿解析为可编辑的结构化题目，并与问卷后端同步
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露后端能力
//! - `SurveyBackend` - 保存字段 / 导出文件 / 读取会话状态
//! - `SurveyApiClient` - 基于 reqwest 的 HTTP 实现
//!
//! ### ② 解析与业务能力层（Parser / Services）
//! - `parser/` - 预处理 → 行分类 → 题目组装，解析从不失败
//! - `services/paginator` - 每 10 题一组的分组视图
//! - `services/serializer` - 由题目序列生成规范化文本
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/store` - 题目序列的唯一所有者：编辑、脏标志、上游同步、保存、导出
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 一次完整运行：加载 → 解析 → 编辑 → 保存 → 导出
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, EditError};
pub use infrastructure::{DraftField, ExportFormat, SurveyApiClient, SurveyBackend};
pub use models::{EditOp, Question, QuestionGroup, QuestionId, QuestionType};
pub use orchestrator::App;
pub use parser::{parse_draft, DraftInput};
pub use services::{paginate, serialize};
pub use workflow::{ReconcileOutcome, ReconcilePolicy, SaveOutcome, SurveyStore};
