//! PageGate access service entry point.
//!
//! # Purpose
//! Wires configuration, storage, and the HTTP router, then serves the API and
//! the Prometheus metrics listener until shutdown.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use accessd::app::{AppState, build_router};
use accessd::auth::identity::seed_admins;
use accessd::config::{AccessdConfig, StorageBackend};
use accessd::observability;
use accessd::store::{AccessStore, memory::InMemoryStore, postgres::PostgresStore};
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AccessdConfig::from_env_or_yaml().context("load accessd config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: AccessdConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("pagegate-accessd");
    let state = build_state(config.clone()).await?;
    let metrics_listener = tokio::net::TcpListener::bind(config.metrics_bind)
        .await
        .with_context(|| format!("bind metrics listener {}", config.metrics_bind))?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        metrics_listener,
    ));

    let app = build_router(state.clone());
    let addr = config.bind_addr;
    tracing::info!(
        %addr,
        backend = state.store.backend_name(),
        "accessd listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: AccessdConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn AccessStore> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            Arc::new(PostgresStore::connect(pg).await?)
        }
    };
    seed_admins(store.as_ref(), &config.seed_admins)
        .await
        .context("seed admin identities")?;
    Ok(AppState::new(store, config.catalog))
}
