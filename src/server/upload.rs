use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use super::{AppState, error::ServerError};

const FIELD_NAME: &str = "image";

/// 生成不易冲突的文件名，保留原扩展名
pub fn stored_file_name(original: Option<&str>) -> String {
    let ext = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        ext
    )
}

fn multipart_error(e: MultipartError) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge
    } else {
        ServerError::Upload(e.body_text())
    }
}

// 添加文件上传路由
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ServerError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FIELD_NAME) {
            continue;
        }

        let file_name = stored_file_name(field.file_name());
        let data = field.bytes().await.map_err(multipart_error)?;
        if data.len() > state.max_upload_bytes {
            warn!("上传文件过大: {} 字节", data.len());
            return Err(ServerError::PayloadTooLarge);
        }

        tokio::fs::create_dir_all(&state.upload_dir).await?;
        tokio::fs::write(state.upload_dir.join(&file_name), &data).await?;
        info!("文件已保存: {} ({} 字节)", file_name, data.len());

        return Ok(Json(json!({ "imageUrl": format!("/uploads/{}", file_name) })));
    }

    Err(ServerError::MissingFile)
}
