use crate::{
    render::{render_page, PageView},
    server::SharedState,
    session::{session_id, Analysis},
    upload::{preview_data_uri, Upload},
};
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;
use trash_prediction::{decode_image_with_limits, PredictionError, Verdict};

const IMAGE_FIELD: &str = "image";

#[derive(Error, Debug)]
pub enum PredictImageError {
    #[error("The model is not available.")]
    ModelUnavailable,
    #[error("No image was uploaded.")]
    NoInput,
    #[error("Unsupported file {0:?}. Supported formats: JPG, JPEG, PNG.")]
    UnsupportedFormat(String),
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Could not read the image: {0}")]
    ImageDecode(PredictionError),
    #[error("Prediction failed: {0}")]
    Prediction(PredictionError),
}

impl PredictImageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictImageError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PredictImageError::NoInput => StatusCode::BAD_REQUEST,
            PredictImageError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            PredictImageError::Multipart(e) => e.status(),
            PredictImageError::ImageDecode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictImageError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for PredictImageError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, PredictImageError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        // Browsers send an empty part when the file input was left blank.
        if data.is_empty() && file_name.is_empty() {
            return Ok(None);
        }

        return Ok(Some(Upload {
            file_name,
            content_type,
            data,
        }));
    }

    Ok(None)
}

/// Runs the full pipeline for one upload. No inference is attempted while the
/// model is unavailable.
pub async fn analyze_upload(
    state: &SharedState,
    upload: Option<Upload>,
) -> Result<Analysis, PredictImageError> {
    let model_service = state
        .model
        .get()
        .service()
        .map_err(|_| PredictImageError::ModelUnavailable)?;

    let upload = upload.ok_or(PredictImageError::NoInput)?;
    if !upload.is_accepted_format() {
        return Err(PredictImageError::UnsupportedFormat(upload.file_name));
    }

    let image = decode_image_with_limits(&upload.data, state.decode_limits).map_err(|e| match e {
        PredictionError::UnsupportedFormat => {
            PredictImageError::UnsupportedFormat(upload.file_name.clone())
        }
        other => PredictImageError::ImageDecode(other),
    })?;
    let (width, height) = (image.width(), image.height());

    let preview = match preview_data_uri(&image) {
        Ok(uri) => Some(uri),
        Err(e) => {
            tracing::warn!("Could not build image preview: {}", e);
            None
        }
    };

    let start = Instant::now();
    let verdict = model_service
        .predict(image)
        .await
        .map_err(PredictImageError::Prediction)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    state
        .metrics
        .record_prediction_duration(duration_ms, "predict");
    state.metrics.record_verdict(verdict.label);

    tracing::info!(
        file = %upload.file_name,
        label = %verdict.label,
        confidence = verdict.confidence,
        raw_score = verdict.raw_score,
        duration_ms,
        "Image classified"
    );

    Ok(Analysis {
        file_name: upload.file_name,
        width,
        height,
        verdict,
        preview,
    })
}

#[instrument(skip(state, jar, multipart))]
pub async fn predict_page(
    State(state): State<SharedState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Response {
    state.metrics.record_request("/predict");

    let (jar, session_id) = session_id(jar);
    let result = match read_upload(multipart).await {
        Ok(upload) => analyze_upload(&state, upload).await,
        Err(e) => Err(e),
    };

    let model_available = state.model.get().is_available();
    let model_downloadable = state.model_path.exists();

    match result {
        Ok(analysis) => {
            let page = render_page(&PageView {
                model_available,
                model_downloadable,
                analysis: Some(&analysis),
                error: None,
            });
            state.sessions.record(&session_id, analysis);
            (jar, Html(page)).into_response()
        }
        Err(e) => {
            tracing::warn!("Image analysis failed: {}", e);
            let page = render_page(&PageView {
                model_available,
                model_downloadable,
                analysis: None,
                error: Some(e.to_string()),
            });
            (e.status_code(), jar, Html(page)).into_response()
        }
    }
}

#[instrument(skip(state, multipart))]
pub async fn predict_json(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<Verdict>, PredictImageError> {
    state.metrics.record_request("/api/predict");

    let upload = read_upload(multipart).await?;
    let analysis = analyze_upload(&state, upload).await?;

    Ok(Json(analysis.verdict))
}
