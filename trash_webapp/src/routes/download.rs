use crate::server::SharedState;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Model not available for download")]
    NotFound,
    #[error("Failed to read model file: {0}")]
    Read(#[from] std::io::Error),
    #[error("HTTP builder failed: {0}")]
    HttpBuilder(String),
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        let status = match self {
            DownloadError::NotFound => StatusCode::NOT_FOUND,
            DownloadError::Read(_) | DownloadError::HttpBuilder(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

#[instrument(skip(state))]
pub async fn download_model(State(state): State<SharedState>) -> Result<Response, DownloadError> {
    state.metrics.record_request("/model");

    let model_data = match tokio::fs::read(&state.model_path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(DownloadError::NotFound),
        Err(e) => return Err(DownloadError::Read(e)),
    };

    let file_name = state
        .model_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("model.onnx");

    Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(model_data))
        .map_err(|e| DownloadError::HttpBuilder(e.to_string()))
}
