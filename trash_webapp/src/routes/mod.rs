mod download;
mod health;
mod index;
mod metrics;
mod predict;
mod reset;

use crate::server::SharedState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(index::index))
        .route("/predict", post(predict::predict_page))
        .route("/api/predict", post(predict::predict_json))
        .route("/reset", post(reset::reset))
        .route("/model", get(download::download_model))
        .route("/health", get(health::healthcheck))
        .route("/metrics", get(metrics::metrics_handler))
}
