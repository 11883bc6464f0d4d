pub mod connection;
pub mod routes;
pub mod types;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use routes::{
    router,
    AppState,
};

use crate::{
    core::DashboardError,
    dashboard::Dashboard,
};

/// Binds `addr` and serves the dashboard until the process exits.
pub async fn serve(dashboard: Arc<Dashboard>, addr: &str) -> Result<(), DashboardError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DashboardError::Custom(format!("Failed to bind to address {}: {}", addr, e)))?;

    log::info!("Dashboard running on http://{}", addr);
    log::info!("Live updates available at ws://{}/ws", addr);

    axum::serve(listener, router(dashboard)).await?;

    Ok(())
}
