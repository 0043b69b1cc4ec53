use crate::{
    config::{Config, UploadConfig},
    routes::api_routes,
    session::SessionStore,
    telemetry::Metrics,
};
use axum::{extract::DefaultBodyLimit, Router};
use axum_otel_metrics::HttpMetricsLayerBuilder;
use std::{path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, sync::broadcast::Receiver, task::JoinHandle};
use trash_prediction::{DecodeLimits, LazyModel};

#[derive(Clone)]
pub struct SharedState {
    pub model: Arc<LazyModel>,
    pub model_path: PathBuf,
    pub sessions: Arc<SessionStore>,
    pub decode_limits: DecodeLimits,
    pub metrics: Arc<Metrics>,
}

impl SharedState {
    pub fn new(model: Arc<LazyModel>, model_path: PathBuf, metrics: Arc<Metrics>) -> Self {
        Self {
            model,
            model_path,
            sessions: Arc::new(SessionStore::default()),
            decode_limits: DecodeLimits::default(),
            metrics,
        }
    }

    pub fn with_decode_limits(mut self, decode_limits: DecodeLimits) -> Self {
        self.decode_limits = decode_limits;
        self
    }
}

pub fn build_router(state: SharedState, upload_config: &UploadConfig) -> Router {
    Router::new()
        .merge(api_routes())
        .layer(DefaultBodyLimit::max(upload_config.max_bytes))
        .with_state(state)
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new(state: SharedState, config: &Config) -> anyhow::Result<Self> {
        let addr = config.server.get_address();
        let metrics_layer = HttpMetricsLayerBuilder::new().build();

        let router = build_router(state, &config.upload).layer(metrics_layer);

        let listener = TcpListener::bind(addr).await?;

        Ok(Self { router, listener })
    }

    pub async fn run(
        self,
        mut shutdown_rx: Receiver<()>,
    ) -> anyhow::Result<JoinHandle<anyhow::Result<()>>> {
        tracing::info!("Starting app on {}", self.listener.local_addr()?);

        let listener = self.listener;
        let router = self.router;
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_rx.recv().await.ok();
                })
                .await?;
            Ok(())
        });

        Ok(server_handle)
    }
}
