use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 后端 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 编辑操作错误
    #[error("编辑错误: {0}")]
    Edit(#[from] EditError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 后端 API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: BoxedSource,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: BoxedSource,
    },
}

/// 编辑操作错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// 题目不存在
    #[error("题目不存在: {id}")]
    QuestionNotFound { id: String },
    /// 题目位置超出范围
    #[error("题目位置 {position} 超出范围 [1, {total}]")]
    PositionOutOfRange { position: usize, total: usize },
    /// 选项索引超出范围
    #[error("选项索引 {index} 超出范围 (共 {len} 个选项)")]
    OptionOutOfRange { index: usize, len: usize },
    /// 选项文本清理后为空，保存后会丢失
    #[error("选项 {index} 的文本为空")]
    BlankOption { index: usize },
    /// 分组索引超出范围
    #[error("分组索引 {index} 超出范围 (共 {len} 组)")]
    GroupOutOfRange { index: usize, len: usize },
    /// 未设置会话ID
    #[error("未设置会话ID，无法保存")]
    NoSession,
    /// 存在未保存的本地修改
    #[error("存在未保存的本地修改，拒绝覆盖")]
    UnsavedEdits,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值无效
    #[error("配置项 {name} 无效: {value}")]
    InvalidValue { name: String, value: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建API错误响应
    pub fn bad_response(endpoint: impl Into<String>, status: u16, message: Option<String>) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 是否为编辑错误
    pub fn as_edit(&self) -> Option<&EditError> {
        match self {
            AppError::Edit(e) => Some(e),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
