use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{ConnectInfo, FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, async_trait};
use contentmix::{CallerId, ContentItem, Mixer};
use serde_json::{Value, json};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    mixer: Arc<Mixer>,
    max_count: Option<usize>,
}

impl AppState {
    #[must_use]
    pub const fn new(mixer: Arc<Mixer>) -> Self {
        Self {
            mixer,
            max_count: None,
        }
    }

    /// Clamp every request's `count` to `max`.
    #[must_use]
    pub const fn with_max_count(mut self, max: Option<usize>) -> Self {
        self.max_count = max;
        self
    }
}

/// Build the router serving mixed content from `mixer`, without a count limit.
pub fn app(mixer: Arc<Mixer>) -> Router {
    router(AppState::new(mixer))
}

/// Build the router from prepared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(mix_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid `{name}` parameter: {value:?}")]
    InvalidParam { name: &'static str, value: String },
    #[error("malformed query string: {0}")]
    MalformedQuery(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("rejecting request: {self}");
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "application/json")],
        )
            .into_response()
    }
}

/// Raw query parameters; numeric validation happens in [`MixParams::parse`].
#[derive(Debug, Default)]
pub struct RawMixParams {
    count: Option<String>,
    offset: Option<String>,
}

impl RawMixParams {
    /// Collect `count` and `offset` from decoded query pairs; the first
    /// occurrence of a repeated key wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "count" => &mut raw.count,
                "offset" => &mut raw.offset,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixParams {
    pub count: usize,
    pub offset: usize,
}

impl MixParams {
    /// Missing parameters default to 0; present ones must be non-negative integers.
    pub fn parse(raw: &RawMixParams) -> Result<Self, ApiError> {
        Ok(Self {
            count: parse_param("count", raw.count.as_deref())?,
            offset: parse_param("offset", raw.offset.as_deref())?,
        })
    }
}

fn parse_param(name: &'static str, value: Option<&str>) -> Result<usize, ApiError> {
    match value {
        None => Ok(0),
        Some(v) => v.trim().parse().map_err(|_| ApiError::InvalidParam {
            name,
            value: v.to_string(),
        }),
    }
}

/// Identity of the end user behind a request.
///
/// First `X-Forwarded-For` entry when present and non-empty, otherwise the
/// peer socket address, otherwise `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub CallerId);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return Ok(Self(CallerId::new(ip)));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| "unknown".to_string(), |ConnectInfo(addr)| addr.to_string());
        Ok(Self(CallerId::new(peer)))
    }
}

async fn mix_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::MalformedQuery(e.body_text()))?;
    let params = MixParams::parse(&RawMixParams::from_pairs(pairs))?;
    let count = match state.max_count {
        Some(max) if params.count > max => {
            warn!(requested = params.count, max, "clamping count");
            max
        }
        _ => params.count,
    };

    let report = state
        .mixer
        .fetch_report(&caller, params.offset, count)
        .await;
    info!(
        caller = %caller,
        count,
        offset = params.offset,
        returned = report.items.len(),
        complete = report.outcome.is_complete(),
        "served mix"
    );
    Ok(Json(report.items))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
