use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobly::api;
use jobly::ax_state::AppState;
use jobly::infra::{config::Config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobly=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = db::init_db(&config)
        .await
        .context("Failed to create pool")?;
    db::ensure_schema(&pool)
        .await
        .context("Failed to create tables")?;

    let state = Arc::new(AppState {
        db: pool,
        secret_key: config.secret_key.clone(),
    });
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("🚀 Jobly 运行在 http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
