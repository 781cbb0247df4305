use crate::error::ConfigError;
use crate::infrastructure::ExportFormat;
use crate::workflow::ReconcilePolicy;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 问卷后端地址
    pub api_base_url: String,
    /// 会话ID（未设置时只做本地解析）
    pub session_id: Option<String>,
    /// 本地草稿文件（.txt / .json / .toml），未设置时从后端拉取
    pub draft_file: Option<String>,
    /// 编辑脚本（TOML）
    pub edits_file: Option<String>,
    /// 导出格式（docx / hwpx），未设置时不导出
    pub export_format: Option<ExportFormat>,
    /// 导出文件存放目录
    pub export_dir: String,
    /// 规范化文本输出文件
    pub canonical_output_file: Option<String>,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 保存失败时整批重发的次数
    pub save_retries: u32,
    /// 上游草稿变化时对本地修改的处理策略
    pub reconcile_policy: ReconcilePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            session_id: None,
            draft_file: None,
            edits_file: None,
            export_format: None,
            export_dir: "exports".to_string(),
            canonical_output_file: None,
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
            request_timeout_secs: 30,
            save_retries: 0,
            reconcile_policy: ReconcilePolicy::Overwrite,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            api_base_url: std::env::var("SURVEY_API_BASE_URL").unwrap_or(default.api_base_url),
            session_id: non_empty_var("SURVEY_SESSION_ID"),
            draft_file: non_empty_var("DRAFT_FILE"),
            edits_file: non_empty_var("EDITS_FILE"),
            export_format: non_empty_var("EXPORT_FORMAT")
                .map(|v| {
                    v.parse().map_err(|_| ConfigError::InvalidValue {
                        name: "EXPORT_FORMAT".to_string(),
                        value: v,
                    })
                })
                .transpose()?,
            export_dir: std::env::var("EXPORT_DIR").unwrap_or(default.export_dir),
            canonical_output_file: non_empty_var("CANONICAL_OUTPUT_FILE"),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: parse_var("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            save_retries: parse_var("SAVE_RETRIES", "u32")?.unwrap_or(default.save_retries),
            reconcile_policy: non_empty_var("RECONCILE_POLICY")
                .map(|v| {
                    v.parse().map_err(|_| ConfigError::InvalidValue {
                        name: "RECONCILE_POLICY".to_string(),
                        value: v,
                    })
                })
                .transpose()?
                .unwrap_or(default.reconcile_policy),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match non_empty_var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
