use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::cache::CacheKey;
use crate::models::TopologyQuery;
use crate::topology::{
    all_server_paths, ClosLayout, ClosParams, ClosTopology, LabelStyle, SearchMode, TopologyPayload,
};
use crate::AppState;

use super::ApiError;

/// Build a Clos fabric and return its tiers, links and all server-to-server paths
pub async fn get_topology(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TopologyQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let params = ClosParams::from(&query);

    // Size check before any allocation; all-pairs search is quadratic in servers
    let layout = ClosLayout::derive(&params)?;
    if layout.num_servers > state.config.max_servers {
        return Err(ApiError::bad_request(format!(
            "fabric would hold {} servers, limit is {}",
            layout.num_servers, state.config.max_servers
        )));
    }
    if layout.num_switches > state.config.max_switches {
        return Err(ApiError::bad_request(format!(
            "fabric would hold {} switches, limit is {}",
            layout.num_switches, state.config.max_switches
        )));
    }

    let key = CacheKey::from_params(&params);
    if let Some(payload) = state.cache.lookup(&key).await {
        tracing::debug!("Serving topology {} from cache", key);
        return Ok(Json(payload.as_ref()).into_response());
    }

    let mode = if state.config.parallel_paths {
        SearchMode::Parallel
    } else {
        SearchMode::Sequential
    };
    let style = state.config.label_style;
    let payload = tokio::task::spawn_blocking(move || compute(params, mode, style))
        .await
        .map_err(|e| anyhow::anyhow!("topology worker failed: {}", e))??;

    tracing::info!(
        "Computed topology {}: {} switches, {} servers, {} paths, {} disconnected pairs",
        key,
        payload.summary.num_switches,
        payload.summary.num_servers,
        payload.paths.len(),
        payload.summary.disconnected_pairs
    );

    let payload = Arc::new(payload);
    state.cache.store(key, payload.clone()).await;
    tracing::debug!("Topology cache holds {} entries", state.cache.len().await);

    Ok(Json(payload.as_ref()).into_response())
}

fn compute(params: ClosParams, mode: SearchMode, style: LabelStyle) -> anyhow::Result<TopologyPayload> {
    let topology = ClosTopology::build(params)?;
    tracing::debug!("Searching server paths for {:?} ({:?})", topology.params(), mode);
    let paths = all_server_paths(&topology, mode);
    Ok(TopologyPayload::from_topology(&topology, &paths, style))
}
