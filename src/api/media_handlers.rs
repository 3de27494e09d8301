//! Webcam recording upload

use crate::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use super::handlers::AppError;

/// Multipart field carrying the WebM payload
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Converted {
        filename: String,
        status: &'static str,
    },
    Failed {
        error: String,
        status: &'static str,
    },
}

/// POST /upload-video — multipart `file` (WebM), transcoded to MP4
///
/// The file part is streamed to a temporary file chunk by chunk, so only one
/// chunk of the upload is held in memory at a time.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let staged = state
        .media
        .staging_file()
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut received = None;
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let mut file = tokio::fs::File::create(staged.path())
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        let mut total = 0usize;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            total += chunk.len();
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        received = Some(total);
        break;
    }
    let received = received
        .ok_or_else(|| AppError::BadRequest(format!("Missing multipart field '{}'", FILE_FIELD)))?;

    tracing::debug!("Received upload of {} bytes", received);

    match state.media.convert_file(staged.path()).await {
        Ok(filename) => Ok((
            StatusCode::OK,
            Json(UploadResponse::Converted {
                filename,
                status: "success",
            }),
        )),
        Err(e) => {
            tracing::error!("Video conversion failed: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UploadResponse::Failed {
                    error: e.to_string(),
                    status: "failed",
                }),
            ))
        }
    }
}

/// Oversized bodies keep their 413; every other multipart failure is a 400
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
