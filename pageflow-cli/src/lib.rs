//! Shared pieces of the `pageflow` binary: the preview HTTP endpoint and the
//! offline content API used by commands that only touch the local cache.

use async_trait::async_trait;
use axum::{
    Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
};
use pageflow_preview::{PreviewRequest, PreviewValidation, validate};
use pageflow_store::{ApiCall, ContentApi, StoreError, StoreResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Route the preview endpoint is mounted at.
pub const PREVIEW_ROUTE: &str = "/api/preview";

/// State of the preview endpoint.
#[derive(Clone)]
pub struct PreviewState {
    pub security_key: String,
}

async fn preview_handler(
    State(state): State<Arc<PreviewState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let request = PreviewRequest::from_query(query.as_deref().unwrap_or_default());

    let validation: PreviewValidation =
        validate(request.preview_key.as_deref(), &state.security_key);
    if !validation.is_ok() {
        warn!(
            "Rejected preview request: {}",
            validation.message.as_deref().unwrap_or_default()
        );
        return (StatusCode::UNAUTHORIZED, Json(validation)).into_response();
    }

    let target = request
        .slug
        .filter(|slug| slug.starts_with('/') && !slug.starts_with("//"))
        .unwrap_or_else(|| "/".to_string());
    info!("Preview mode enabled, redirecting to {target}");
    Redirect::temporary(&target).into_response()
}

/// Builds the HTTP router serving the preview endpoint.
pub fn build_router(state: Arc<PreviewState>) -> Router {
    Router::new()
        .route(PREVIEW_ROUTE, get(preview_handler))
        .with_state(state)
}

/// A content API with no transport. Every call fails, so only the local
/// mirror can answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineApi;

#[async_trait]
impl ContentApi for OfflineApi {
    async fn get(&self, call: &ApiCall) -> StoreResult<Option<serde_json::Value>> {
        Err(StoreError::Unavailable(format!(
            "no content api transport configured for {}",
            call.path
        )))
    }
}
