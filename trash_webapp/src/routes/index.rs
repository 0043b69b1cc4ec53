use crate::{
    render::{render_page, PageView},
    server::SharedState,
    session::session_id,
};
use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

#[instrument(skip(state, jar))]
pub async fn index(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    state.metrics.record_request("/");

    let (jar, session_id) = session_id(jar);
    let analysis = state.sessions.last_analysis(&session_id);
    let page = render_page(&PageView {
        model_available: state.model.get().is_available(),
        model_downloadable: state.model_path.exists(),
        analysis: analysis.as_ref(),
        error: None,
    });

    (jar, Html(page))
}
