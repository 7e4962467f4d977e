pub mod auth;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{
    config::Config,
    models::bien::Bien,
    mongo::{self, queries::DEFAULT_LIMIT},
    services::store::{DocumentStore, ListingStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub listings: Arc<dyn ListingStore>,
    pub documents: Arc<dyn DocumentStore>,
}

#[derive(Debug, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub prix_min: i32,
    #[serde(default = "default_max_price")]
    pub prix_max: i32,
}

#[derive(Debug, Deserialize)]
pub struct SurfaceRange {
    #[serde(default)]
    pub surface_min: i32,
    #[serde(default = "default_max_surface")]
    pub surface_max: i32,
}

/// Values below 1 are raised to 1.
#[derive(Debug, Deserialize)]
pub struct Limit {
    pub limit: Option<i64>,
}

fn default_max_price() -> i32 {
    1_000_000
}

fn default_max_surface() -> i32 {
    500
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/biens/agence/:id_agence", get(biens_by_agency))
        .route("/biens/filtre-prix", get(biens_by_price))
        .route("/biens/filtre-surface", get(biens_by_surface))
        .route("/mongo/descriptions-logements", get(descriptions))
        .route("/mongo/indicateurs-foncieres", get(indicators))
        .route("/mongo/villes-autour-rennes", get(cities))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/token", post(auth::issue_token))
        .merge(protected)
        .layer(middleware::from_fn(cors_layer))
        .with_state(state)
}

pub async fn start_http_server(state: AppState) -> anyhow::Result<()> {
    let bind_addr = state.config.http_bind_address.clone();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("API listening on {}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down API");
        })
        .await?;
    Ok(())
}

async fn cors_layer(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        apply_cors_headers(response.headers_mut());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        let mut response = next.run(req).await;
        apply_cors_headers(response.headers_mut());
        response
    }
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, content-type"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
}

pub(crate) fn internal_error(e: &crate::Error) -> Response {
    error!("Error while serving request: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal server error" })),
    )
        .into_response()
}

type ApiResult<T> = Result<Json<T>, Response>;

async fn biens_by_agency(
    State(state): State<AppState>,
    Path(id_agence): Path<i32>,
) -> ApiResult<Vec<Bien>> {
    state
        .listings
        .biens_by_agency(id_agence)
        .await
        .map(Json)
        .map_err(|e| internal_error(&e))
}

async fn biens_by_price(
    State(state): State<AppState>,
    Query(range): Query<PriceRange>,
) -> ApiResult<Vec<Bien>> {
    state
        .listings
        .biens_by_price(range.prix_min, range.prix_max)
        .await
        .map(Json)
        .map_err(|e| internal_error(&e))
}

async fn biens_by_surface(
    State(state): State<AppState>,
    Query(range): Query<SurfaceRange>,
) -> ApiResult<Vec<Bien>> {
    state
        .listings
        .biens_by_surface(range.surface_min, range.surface_max)
        .await
        .map(Json)
        .map_err(|e| internal_error(&e))
}

async fn documents_of(state: &AppState, collection: &str, limit: Limit) -> ApiResult<Vec<Value>> {
    state
        .documents
        .find(collection, limit.limit.unwrap_or(DEFAULT_LIMIT).max(1))
        .await
        .map(Json)
        .map_err(|e| internal_error(&e))
}

async fn descriptions(State(state): State<AppState>, Query(limit): Query<Limit>) -> ApiResult<Vec<Value>> {
    documents_of(&state, mongo::DESCRIPTIONS, limit).await
}

async fn indicators(State(state): State<AppState>, Query(limit): Query<Limit>) -> ApiResult<Vec<Value>> {
    documents_of(&state, mongo::INDICATORS, limit).await
}

async fn cities(State(state): State<AppState>, Query(limit): Query<Limit>) -> ApiResult<Vec<Value>> {
    documents_of(&state, mongo::CITIES, limit).await
}
