use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use merch_core::{render_page, ProductId, ViewEvent, ViewState};
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub(super) struct PageQuery {
    pub filter: Option<String>,
}

impl PageQuery {
    fn view_state(&self, catalog: &[merch_core::Product]) -> ViewState {
        let mut state = ViewState::new();
        if let Some(filter) = self.filter.as_deref() {
            state.apply(catalog, ViewEvent::SelectFilter(filter.to_owned()));
        }
        state
    }
}

/// `GET /`: the catalog page with the requested filter applied.
pub(super) async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let catalog = state.loader.load_or_empty().await;
    let view = query.view_state(&catalog);
    Html(render_page(&catalog, &view, &state.render))
}

/// `GET /products/{id}`: deep link to a product, rendered as a fresh page
/// view with the detail modal open. Cards on the page open their in-page
/// panels instead and never hit this route.
///
/// An id that is not in the current catalog answers 404 with the page
/// rendered closed.
pub(super) async fn product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let catalog = state.loader.load_or_empty().await;
    let mut view = query.view_state(&catalog);
    let opened = view.apply(&catalog, ViewEvent::OpenProduct(ProductId::from(id.as_str())));

    let page = Html(render_page(&catalog, &view, &state.render));
    if opened {
        page.into_response()
    } else {
        tracing::debug!(product_id = %id, "product not in catalog");
        (StatusCode::NOT_FOUND, page).into_response()
    }
}
