/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use crate::models::question::QuestionGroup;
use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅者
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("survey_draft_editor={}", default_level)));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n问卷草稿处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 问卷草稿编辑");
    info!("🌐 后端地址: {}", config.api_base_url);
    info!(
        "🔑 会话: {}",
        config.session_id.as_deref().unwrap_or("(未设置，仅本地解析)")
    );
    info!("🔀 同步策略: {}", config.reconcile_policy);
    info!("{}", "=".repeat(60));
}

/// 记录分组视图
pub fn log_groups(groups: &[QuestionGroup<'_>]) {
    info!("\n{}", "─".repeat(60));
    for group in groups {
        let marker = if group.is_expanded { "▼" } else { "▶" };
        info!(
            "{} 第 {}-{} 题 ({} 道)",
            marker,
            group.start_num,
            group.end_num,
            group.len()
        );
        if !group.is_expanded {
            continue;
        }
        for (offset, question) in group.questions.iter().enumerate() {
            info!(
                "   {}. [{}] {} · {} 个选项",
                group.start_num + offset,
                question.question_type,
                truncate_text(&question.text, 30),
                question.options.len()
            );
        }
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📋 题目数: {}", summary.questions);
    info!("✏️ 已应用编辑: {}", summary.edits_applied);
    info!("💾 已保存: {}", if summary.saved { "是" } else { "否" });
    if let Some(path) = &summary.exported {
        info!("📤 导出文件: {}", path);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 一次运行的汇总
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub questions: usize,
    pub edits_applied: usize,
    pub saved: bool,
    pub exported: Option<String>,
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
