use adspot_core::PlatformError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// API 错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 验证错误
    ValidationError(String),
    /// 文件加载错误
    FileLoadError(String),
    /// 文件内容错误
    InvalidData(String),
    /// 请求错误
    BadRequest(String),
    /// 内部错误
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::FileLoadError(msg) => write!(f, "File load error: {}", msg),
            ApiError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::ValidationError(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::FileLoadError(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InvalidData(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InternalError(ref msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %error_message, "Request rejected");
        }

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

// 从 adspot_core::PlatformError 转换
impl From<PlatformError> for ApiError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Validation(msg) => ApiError::ValidationError(msg),
            PlatformError::FileLoad(msg) => ApiError::FileLoadError(msg),
            err @ PlatformError::InvalidData { .. } => ApiError::InvalidData(err.to_string()),
            PlatformError::InvalidLocation(msg) => ApiError::ValidationError(msg),
        }
    }
}

impl ApiError {
    /// 转换 multipart 解析错误
    ///
    /// 请求体超出上限时与上传策略的大小校验返回同样的错误。
    pub fn from_multipart(err: MultipartError, max_bytes: usize) -> Self {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::ValidationError(format!(
                "file is too large, maximum size is {} bytes",
                max_bytes
            ))
        } else if status.is_server_error() {
            ApiError::InternalError(err.body_text())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
