//! Dev-Share HTTP server

use anyhow::Context;
use devshare_api::{AppConfig, AppState, build_router};
use devshare_core::RepositoryFactory;
use devshare_storage::{Driver, PostgresBackend, SqliteBackend};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("load configuration")?;
    let _guard = devshare_log::init_with(config.log.clone()).context("initialize logging")?;

    match config.database.backend {
        Driver::Sqlite => {
            let backend = SqliteBackend::open(&config.database)
                .await
                .context("open sqlite database")?;
            serve(backend.clone(), config).await?;
            backend.close().await;
        }
        Driver::Postgres => {
            let backend = PostgresBackend::open(&config.database)
                .await
                .context("open postgres database")?;
            serve(backend.clone(), config).await?;
            backend.close().await;
        }
    }

    tracing::info!("server stopped");
    Ok(())
}

async fn serve<F: RepositoryFactory>(repos: F, config: AppConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let app = build_router(AppState::new(repos, config));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, "devshare server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
