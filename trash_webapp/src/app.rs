use crate::config::Config;
use crate::server::{HttpServer, SharedState};
use crate::telemetry::Metrics;

use std::sync::Arc;
use tokio::{signal, sync::broadcast};
use trash_prediction::{config::Validatable, LazyModel, ModelService, OrtModelService};

pub async fn start_app(config: Config) -> anyhow::Result<()> {
    let model_config = config.model.clone();
    let model = Arc::new(LazyModel::new(move || {
        OrtModelService::new(&model_config).map(|service| Arc::new(service) as Arc<dyn ModelService>)
    }));

    // Load eagerly so the first visitor already sees whether analysis is enabled.
    let model_for_init = model.clone();
    tokio::task::spawn_blocking(move || {
        model_for_init.get();
    })
    .await?;

    let metrics = Arc::new(Metrics::new()?);
    let state = SharedState::new(model, config.model.get_path(), metrics)
        .with_decode_limits(config.upload.decode_limits());
    let server = HttpServer::new(state, &config).await?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let server_shutdown_rx = shutdown_tx.subscribe();

    let server_handle = server.run(server_shutdown_rx).await?;

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown.");

    let _ = shutdown_tx.send(());
    server_handle.await??;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
