/// Health check endpoint
///
/// Verifies the server is running and the database answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "connections": { "total": 4, "idle": 3 }
/// }
/// ```

use crate::{app::AppState, error::ApiResult, extract::Json};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tender_shared::db::pool::{get_pool_stats, health_check as ping};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,

    pub connections: ConnectionCounts,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionCounts {
    pub total: usize,
    pub idle: usize,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match ping(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };
    let stats = get_pool_stats(&state.db);

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: tender_shared::VERSION.to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        connections: ConnectionCounts {
            total: stats.total_connections,
            idle: stats.idle_connections,
        },
    }))
}
