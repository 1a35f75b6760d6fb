use std::sync::Arc;

use anyhow::Context as _;

use smartstock_dashboard::app::build_app;
use smartstock_dashboard::config::DashboardConfig;
use smartstock_dashboard::context::AppContext;
use smartstock_dashboard::refresher::spawn_refresher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    smartstock_observability::init();

    let config = DashboardConfig::from_env();
    let bind = config.bind;
    let refresh = config.refresh_interval;

    // Training is CPU-bound; keep it off the async workers.
    let ctx = tokio::task::spawn_blocking(move || AppContext::bootstrap(config))
        .await
        .context("bootstrap task panicked")??;
    let ctx = Arc::new(ctx);

    let refresher = spawn_refresher(Arc::clone(&ctx), refresh);
    let app = build_app(ctx);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!(addr = %listener.local_addr()?, "dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    refresher.shutdown();
    tracing::info!("dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
