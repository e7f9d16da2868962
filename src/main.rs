use anyhow::Context as _;
use docqa::{
    config::load_user_config,
    embedding::build_embedder,
    qa::QAService,
    server::{AppState, create_router},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cfg = Arc::new(load_user_config().context("Failed to load configuration")?);

    let log_level: log::Level = cfg.log_level.clone().into();
    simple_logger::init_with_level(log_level).context("Failed to initialise logger")?;

    let embedder = build_embedder(&cfg).context("Failed to initialise embedding provider")?;
    let qa_service = Arc::new(QAService::new(cfg.clone(), embedder));
    let app = create_router(AppState::new(qa_service));

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}
