//! Read-only JSON API over the last published cycle.

use crate::arbitrage::{ArbitrageOpportunity, Stats};
use crate::models::PriceSnapshot;
use crate::state::SharedState;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    cycle: u64,
}

pub fn router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/prices", get(prices))
        .route("/api/arbs", get(opportunities))
        .route("/api/stats", get(stats))
        .with_state(state)
}

/// Bind `addr` and serve until the listener fails.
pub async fn serve(addr: SocketAddr, state: Arc<SharedState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "[API] listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health(State(state): State<Arc<SharedState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cycle: state.latest().cycle,
    })
}

async fn prices(State(state): State<Arc<SharedState>>) -> Json<PriceSnapshot> {
    Json(state.prices())
}

async fn opportunities(State(state): State<Arc<SharedState>>) -> Json<Vec<ArbitrageOpportunity>> {
    Json(state.opportunities())
}

async fn stats(State(state): State<Arc<SharedState>>) -> Json<Stats> {
    Json(state.stats())
}
