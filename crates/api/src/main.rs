use anyhow::Context;

use partyhub_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    partyhub_observability::init();

    let config = AppConfig::from_env().context("loading configuration")?;
    let app = partyhub_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
