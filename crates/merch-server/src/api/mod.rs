mod catalog;
mod pages;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use merch_core::{AppConfig, RenderOptions};
use merch_scraper::{CatalogLoader, CatalogSource};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{reject_hidden_paths, request_id, RequestId, REQUEST_ID_HEADER};

/// Stylesheet the rendered pages link to, relative to the site root.
const STYLESHEET: &str = "styles.css";

#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<CatalogLoader>,
    pub render: Arc<RenderOptions>,
}

impl AppState {
    #[must_use]
    pub fn new(loader: CatalogLoader, render: RenderOptions) -> Self {
        Self {
            loader: Arc::new(loader),
            render: Arc::new(render),
        }
    }
}

/// Files served next to the rendered pages. Nothing else on disk is
/// reachable over HTTP.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    /// URL prefix of local images, without slashes (`images`).
    pub images_prefix: String,
    /// Directory the image files are read from.
    pub images_path: PathBuf,
    /// `styles.css` of the local site root; only set when the catalog itself
    /// is read from a local directory.
    pub stylesheet: Option<PathBuf>,
}

impl StaticAssets {
    /// Derives the served directories from the configured images dir and
    /// the loader's catalog source.
    #[must_use]
    pub fn from_config(config: &AppConfig, source: &CatalogSource) -> Self {
        let images_prefix = url_prefix(&config.images_dir);
        let configured = Path::new(&config.images_dir);
        match source {
            CatalogSource::Directory(root) if configured.is_relative() => Self {
                images_prefix,
                images_path: root.join(configured),
                stylesheet: Some(root.join(STYLESHEET)),
            },
            CatalogSource::Directory(root) => Self {
                images_prefix,
                images_path: configured.to_path_buf(),
                stylesheet: Some(root.join(STYLESHEET)),
            },
            CatalogSource::Remote(_) => Self {
                images_prefix,
                images_path: configured.to_path_buf(),
                stylesheet: None,
            },
        }
    }
}

fn url_prefix(images_dir: &str) -> String {
    images_dir
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string()
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
    products: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "catalog_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState, assets: &StaticAssets) -> Router {
    let api_routes = Router::new()
        .route(
            "/catalog.json",
            get(catalog::catalog_json).layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        .route("/api/v1/health", get(health))
        .layer(build_cors());

    let mut app = Router::new()
        .route("/", get(pages::index))
        .route("/products/{id}", get(pages::product))
        .merge(api_routes);

    if !assets.images_prefix.is_empty() {
        app = app.nest_service(
            &format!("/{}", assets.images_prefix),
            ServeDir::new(&assets.images_path),
        );
    }
    if let Some(stylesheet) = &assets.stylesheet {
        app = app.route_service(&format!("/{STYLESHEET}"), ServeFile::new(stylesheet));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(request_id))
            .layer(axum::middleware::from_fn(reject_hidden_paths))
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new()),
    )
    .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.loader.load().await {
        Ok(products) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    catalog: "ok",
                    products: products.len(),
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: catalog unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        catalog: "unavailable",
                        products: 0,
                    },
                    meta,
                }),
            )
        }
    }
}
