use axum::{extract::State, Extension, Json};
use merch_core::Product;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// `GET /catalog.json`: the catalog as currently loadable. The route adds
/// `Cache-Control: no-store`.
pub(super) async fn catalog_json(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<Product>>, ApiError> {
    state.loader.load().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "catalog.json: catalog unavailable");
        ApiError::new(req_id.0, "catalog_unavailable", "catalog could not be loaded")
    })
}
