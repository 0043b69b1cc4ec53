use crate::server::SharedState;
use axum::{extract::State, response::IntoResponse, response::Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Status {
    status: String,
    model: String,
}

pub async fn healthcheck(State(state): State<SharedState>) -> impl IntoResponse {
    let model = if state.model.get().is_available() {
        "loaded"
    } else {
        "unavailable"
    };

    Json(Status {
        status: "Available".into(),
        model: model.into(),
    })
}
