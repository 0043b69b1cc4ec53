use crate::{server::SharedState, session::SESSION_COOKIE};
use axum::{extract::State, response::Redirect};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

#[instrument(skip(state, jar))]
pub async fn reset(State(state): State<SharedState>, jar: CookieJar) -> Redirect {
    state.metrics.record_request("/reset");
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.reset(cookie.value());
        tracing::debug!("Session cleared");
    }

    Redirect::to("/")
}
