use anyhow::{anyhow, Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use cytocheck::common::config::AppCfg;
use cytocheck::common::log;
use cytocheck::{load_handle, router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = AppCfg::load();
    log::init(&cfg)
        .map_err(|err| anyhow!(err))
        .context("installing log subscriber")?;

    let model = load_handle(&cfg);
    let model_loaded = model.is_available();
    let app = router(AppState::new(model));

    let listener = TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;

    info!(
        addr = %cfg.bind_addr,
        model_path = %cfg.model_path.display(),
        model_loaded,
        "cytocheck listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    info!("cytocheck stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            warn!(error = %err, "cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
