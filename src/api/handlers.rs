//! API Handlers
//!
//! HTTP request handlers for each link server endpoint. Handlers only
//! translate between HTTP and [`LinkService`]; every rule lives in the service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    Json,
};

use crate::config::Config;
use crate::error::{LinkError, Result};
use crate::links::{current_timestamp_ms, LinkService, LinkStore, OpenOutcome};
use crate::models::{
    CreateLinkRequest, DeleteResponse, EditRequest, HealthResponse, LinkResponse,
    OwnerLinksResponse, OwnerResponse, RegisterOwnerRequest, StatsResponse,
};

/// Header carrying the caller's owner id.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: LinkService,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: LinkService) -> Self {
        Self { service }
    }

    /// Creates a new AppState from a store and configuration.
    pub fn from_config(store: Arc<LinkStore>, config: &Config) -> Self {
        Self::new(LinkService::new(store, config))
    }
}

/// Reads the requester's owner id from [`OWNER_HEADER`].
fn requester(headers: &HeaderMap) -> Result<String> {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(LinkError::MissingOwner)
}

/// Handler for POST /owners
///
/// Registers the requested owner id, or a freshly generated one.
pub async fn register_owner_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterOwnerRequest>,
) -> (StatusCode, Json<OwnerResponse>) {
    let id = state.service.ensure_owner(req.id.as_deref()).await;
    (StatusCode::CREATED, Json(OwnerResponse { id }))
}

/// Handler for GET /owners/:id/links
///
/// `id` may be a unique prefix of a registered owner id.
pub async fn owner_links_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OwnerLinksResponse>> {
    let owner = state
        .service
        .resolve_owner(&id)
        .await
        .ok_or_else(|| LinkError::NotFound(id.clone()))?;

    let now = current_timestamp_ms();
    let links = state
        .service
        .list(&owner)
        .await
        .into_iter()
        .map(|link| LinkResponse::from_link(link, now))
        .collect();

    Ok(Json(OwnerLinksResponse { owner, links }))
}

/// Handler for POST /links
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>)> {
    let owner = requester(&headers)?;
    let link = state
        .service
        .create_with_defaults(&owner, &req.url, req.max_clicks, req.ttl_seconds)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, current_timestamp_ms())),
    ))
}

/// Handler for GET /links/:code
///
/// Reads a link without counting a click or evicting it.
pub async fn info_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>> {
    let link = state
        .service
        .info(&code)
        .await
        .ok_or(LinkError::NotFound(code))?;

    Ok(Json(LinkResponse::from_link(link, current_timestamp_ms())))
}

/// Handler for DELETE /links/:code
pub async fn delete_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let owner = requester(&headers)?;
    state.service.try_delete(&code, &owner).await?;

    Ok(Json(DeleteResponse::new(code)))
}

/// Handler for PATCH /links/:code/limit
pub async fn edit_limit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Json(req): Json<EditRequest>,
) -> Result<Json<LinkResponse>> {
    let owner = requester(&headers)?;
    let link = state.service.try_edit_limit(&code, &owner, req.value).await?;

    Ok(Json(LinkResponse::from_link(link, current_timestamp_ms())))
}

/// Handler for PATCH /links/:code/ttl
pub async fn edit_ttl_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Json(req): Json<EditRequest>,
) -> Result<Json<LinkResponse>> {
    let owner = requester(&headers)?;
    let link = state.service.try_edit_ttl(&code, &owner, req.value).await?;

    Ok(Json(LinkResponse::from_link(link, current_timestamp_ms())))
}

/// Handler for GET /r/:code
///
/// Counts a click and redirects to the target URL.
pub async fn open_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Redirect> {
    match state.service.open(&code).await {
        OpenOutcome::Redirect { url, .. } => Ok(Redirect::temporary(&url)),
        OpenOutcome::NotFound => Err(LinkError::NotFound(code)),
        OpenOutcome::Expired | OpenOutcome::Depleted => Err(LinkError::Gone(code)),
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.service.store().stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
