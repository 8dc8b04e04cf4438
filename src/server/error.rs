use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::parser::errors::ParseError;
use crate::store::errors::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("没有上传文件")]
    MissingFile,

    #[error("文件大小超过限制")]
    PayloadTooLarge,

    #[error("文件上传失败: {0}")]
    Upload(String),

    #[error("IO操作失败: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(e) => match e {
                StoreError::Validation(_) | StoreError::InvalidIcon(_) => StatusCode::BAD_REQUEST,
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::DuplicateKey { .. } | StoreError::DuplicateName(_) => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Parse(e) => match e {
                ParseError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                ParseError::UnsupportedProvider | ParseError::MalformedShareLink(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ParseError::WrongPassword => StatusCode::FORBIDDEN,
                ParseError::Resolution(_) => StatusCode::BAD_GATEWAY,
            },
            Self::MissingFile | Self::Upload(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Store(e) => e.kind(),
            Self::Parse(e) => e.kind(),
            Self::MissingFile => "missing_file",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Upload(_) => "upload_failed",
            Self::IoError(_) => "io",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("请求处理失败: {}", self);
        }
        let body = json!({ "error": self.to_string(), "kind": self.kind() });
        (status, Json(body)).into_response()
    }
}
