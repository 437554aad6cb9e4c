//! Minimal liveness surface for hosting platforms that ping the process
//! to keep it alive.

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing::info;

pub async fn serve(port: u16) -> Result<()> {
    let app = Router::new().route("/", get(health));

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("could not bind liveness server on {bind_addr}"))?;
    info!("liveness server listening on {bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "Bot is running"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_running() {
        assert_eq!(health().await, "Bot is running");
    }
}
