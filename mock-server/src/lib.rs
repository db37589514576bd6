use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::debug;

pub mod fixtures;

pub use fixtures::Layers;

/// Page size the API falls back to when `pagenum` is omitted.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Query string of the feature endpoint: `?layers=c1161&pagenum=5`.
#[derive(Debug, Deserialize)]
pub struct FeatureQuery {
    pub layers: String,
    pub pagenum: Option<usize>,
}

/// Response envelope, shaped like the real API's.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeaturePage {
    pub num: usize,
    pub results: Vec<Value>,
}

pub type Db = Arc<Layers>;

pub fn app() -> Router {
    app_with(fixtures::layers())
}

pub fn app_with(layers: Layers) -> Router {
    let db: Db = Arc::new(layers);
    Router::new()
        .route("/map/api/feature/{map_id}", get(list_features))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_features(
    State(db): State<Db>,
    Path(map_id): Path<u32>,
    Query(query): Query<FeatureQuery>,
) -> Result<Response, StatusCode> {
    let records = db.get(&query.layers).ok_or(StatusCode::NOT_FOUND)?;
    let page_size = query.pagenum.unwrap_or(DEFAULT_PAGE_SIZE);
    debug!(map_id, layer = %query.layers, page_size, "serving feature page");

    let page = FeaturePage {
        num: records.len(),
        results: records.iter().take(page_size).cloned().collect(),
    };
    Ok((
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        Json(page),
    )
        .into_response())
}
