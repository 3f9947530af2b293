mod errors;
mod params;

use errors::ApiError;
use params::SearchParams;

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::ckan::CkanClient;
use crate::search::{SearchRequest, SearchResponse, SearchService};

type AppState = Arc<SearchService<CkanClient>>;

/// Routes served by basept. Only `GET /search` is exposed.
pub fn router(service: SearchService<CkanClient>) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(Arc::new(service))
}

async fn search(
    State(service): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| {
        warn!(error = %e.body_text(), "rejected search parameters");
        ApiError::InvalidParams(e.body_text())
    })?;

    let request = SearchRequest::new(params.q, params.rows, params.start)?;

    info!(
        query = %request.term(),
        rows = request.rows(),
        start = request.start(),
        "GET /search"
    );

    let response = service
        .search(&request)
        .await
        .inspect_err(|e| warn!(error = %e, transport = e.is_transport(), "search failed"))?;

    Ok(Json(response))
}
