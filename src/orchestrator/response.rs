//! 响应封装
//!
//! 成功时为二进制文档或预览 JSON，失败时为 `{error, message?}`。

use crate::error::AppError;
use crate::render::OutputFormat;
use crate::template::TemplateId;
use chrono::NaiveDate;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    /// 附件文件名；只有生成成功时存在
    pub filename: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    /// 生成成功
    pub fn document(format: OutputFormat, filename: String, body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: format.content_type().to_string(),
            filename: Some(filename),
            body,
        }
    }

    /// 预览成功
    pub fn json(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: JSON.to_string(),
            filename: None,
            body,
        }
    }

    /// 错误映射：校验 400，缺少个人信息 422，其余 500
    pub fn from_error(err: &AppError, production: bool) -> Self {
        let (status, body) = match err {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "validation failed".to_string(),
                    message: Some(e.to_string()),
                },
            ),
            AppError::MissingIdentity { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "personal information required".to_string(),
                    message: None,
                },
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "generation failed".to_string(),
                    message: (!production).then(|| other.to_string()),
                },
            ),
        };

        // ErrorBody 只含字符串字段，序列化不会失败
        let body = serde_json::to_vec(&body).unwrap_or_default();
        Self {
            status,
            content_type: JSON.to_string(),
            filename: None,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `Content-Disposition` 头
    pub fn content_disposition(&self) -> Option<String> {
        self.filename
            .as_ref()
            .map(|name| format!("attachment; filename=\"{}\"", name))
    }

    /// 解析错误响应体
    pub fn error_body(&self) -> Option<ErrorBody> {
        if self.is_success() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }
}

/// `CV_<姓名>_<模板>_<日期>.<扩展名>`，姓名去掉空白
pub fn filename(name: &str, template: TemplateId, format: OutputFormat, date: NaiveDate) -> String {
    let compact = match Regex::new(r#"[\s"\\/]+"#) {
        Ok(re) => re.replace_all(name.trim(), "").into_owned(),
        Err(_) => name.chars().filter(|c| !c.is_whitespace()).collect(),
    };
    format!(
        "CV_{}_{}_{}.{}",
        compact,
        template,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}
