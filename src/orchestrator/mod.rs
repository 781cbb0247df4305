//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 管理应用生命周期（初始化、运行），调度一次完整的
//! 加载 → 解析 → 编辑 → 保存 → 导出，并输出统计信息。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次运行)
//!     ↓
//! workflow::SurveyStore (题目序列 + 编辑 + 保存)
//!     ↓
//! services (能力层：paginate / serialize) + parser
//!     ↓
//! infrastructure (基础设施：SurveyBackend)
//! ```

pub mod app;

pub use app::App;
