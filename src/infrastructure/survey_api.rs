//! 问卷后端 - 基础设施层
//!
//! 只暴露"保存字段 / 导出文件 / 读取草稿"三种能力，不认识题目结构

use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 会话状态中保存问卷文本的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// 问卷草稿
    Draft,
    /// 最终问卷
    Final,
}

impl DraftField {
    pub fn name(self) -> &'static str {
        match self {
            DraftField::Draft => "survey_draft",
            DraftField::Final => "final_survey",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Docx,
    Hwpx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Hwpx => "hwpx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(ExportFormat::Docx),
            "hwpx" => Ok(ExportFormat::Hwpx),
            other => Err(format!("不支持的导出格式: {}", other)),
        }
    }
}

/// 导出得到的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 问卷后端能力
#[async_trait]
pub trait SurveyBackend: Send + Sync {
    /// 更新会话状态中的一个字段
    async fn persist(&self, session_id: &str, field: DraftField, value: &str) -> AppResult<()>;

    /// 请求后端渲染并下载文件
    async fn export_document(
        &self,
        session_id: &str,
        format: ExportFormat,
    ) -> AppResult<ExportedDocument>;

    /// 读取会话中的问卷文本（优先最终问卷，其次草稿）
    async fn fetch_draft(&self, session_id: &str) -> AppResult<Option<JsonValue>>;
}

/// 基于 HTTP 的问卷后端客户端
pub struct SurveyApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SurveyApiClient {
    /// 创建新的后端客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/survey/{}", self.base_url, path)
    }

    /// 非 2xx 响应转为错误
    async fn ensure_success(endpoint: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<JsonValue>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(str::to_string));
        Err(AppError::bad_response(endpoint, status.as_u16(), message))
    }
}

#[async_trait]
impl SurveyBackend for SurveyApiClient {
    async fn persist(&self, session_id: &str, field: DraftField, value: &str) -> AppResult<()> {
        let endpoint = self.endpoint(&format!("state/{}/{}", session_id, field.name()));
        debug!("保存字段 {} ({} 字符)", field, value.chars().count());

        let response = self
            .http
            .put(&endpoint)
            .json(&json!({ "value": value }))
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;
        let response = Self::ensure_success(&endpoint, response).await?;

        let body: JsonValue = response.json().await?;
        if is_success_response(&body) {
            Ok(())
        } else {
            Err(AppError::bad_response(&endpoint, 200, Some(body.to_string())))
        }
    }

    async fn export_document(
        &self,
        session_id: &str,
        format: ExportFormat,
    ) -> AppResult<ExportedDocument> {
        let endpoint = self.endpoint(&format!("export/{}", session_id));
        debug!("请求导出: {} ({})", session_id, format);

        let response = self
            .http
            .post(&endpoint)
            .json(&json!({ "format": format }))
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;
        let response = Self::ensure_success(&endpoint, response).await?;

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(file_name_from_disposition)
            .unwrap_or_else(|| default_file_name(format));
        let bytes = response.bytes().await?.to_vec();

        Ok(ExportedDocument { file_name, bytes })
    }

    async fn fetch_draft(&self, session_id: &str) -> AppResult<Option<JsonValue>> {
        let endpoint = self.endpoint(&format!("state/{}", session_id));

        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;
        let response = Self::ensure_success(&endpoint, response).await?;

        let body: JsonValue = response.json().await?;
        Ok(draft_from_state(&body))
    }
}

/// 检查保存响应是否成功
pub fn is_success_response(body: &JsonValue) -> bool {
    body.get("success").and_then(|v| v.as_bool()).unwrap_or(false)
}

/// 从会话状态响应中取出问卷文本
pub fn draft_from_state(body: &JsonValue) -> Option<JsonValue> {
    let state = body.get("state")?;
    [DraftField::Final, DraftField::Draft]
        .into_iter()
        .filter_map(|field| state.get(field.name()))
        .find(|value| !is_blank(value))
        .cloned()
}

fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// 解析 `attachment; filename=survey_20250101_120000.docx`
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

fn default_file_name(format: ExportFormat) -> String {
    format!(
        "survey_{}.{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(DraftField::Draft.name(), "survey_draft");
        assert_eq!(DraftField::Final.name(), "final_survey");
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("DOCX".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert_eq!(" hwpx ".parse::<ExportFormat>().unwrap(), ExportFormat::Hwpx);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(serde_json::to_value(ExportFormat::Hwpx).unwrap(), "hwpx");
    }

    #[test]
    fn test_file_name_from_disposition() {
        assert_eq!(
            file_name_from_disposition("attachment; filename=survey_20250101_120000.docx").as_deref(),
            Some("survey_20250101_120000.docx")
        );
        assert_eq!(
            file_name_from_disposition("attachment; filename=\"a.hwpx\"").as_deref(),
            Some("a.hwpx")
        );
        assert_eq!(file_name_from_disposition("attachment"), None);
    }

    #[test]
    fn test_draft_from_state_prefers_final() {
        let body = json!({"state": {"survey_draft": "초안", "final_survey": "최종"}});
        assert_eq!(draft_from_state(&body), Some(json!("최종")));

        let body = json!({"state": {"survey_draft": "초안", "final_survey": ""}});
        assert_eq!(draft_from_state(&body), Some(json!("초안")));

        let body = json!({"state": {}});
        assert_eq!(draft_from_state(&body), None);
    }

    #[test]
    fn test_is_success_response() {
        assert!(is_success_response(&json!({"success": true, "field": "survey_draft"})));
        assert!(!is_success_response(&json!({"detail": "세션을 찾을 수 없습니다"})));
    }
}
