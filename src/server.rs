//! JSON endpoints over the repository.
//!
//! Each request gets its own locale preference: the `locale` query
//! parameter, else the first `Accept-Language` tag, else the configured
//! default.

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{ApiError, EuropeanaApi, Params};
use crate::config::Config;
use crate::document::Document;
use crate::i18n::LocalePreference;
use crate::repository::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Repository,
    pub default_locale: String,
}

impl AppState {
    fn locale(&self, headers: &HeaderMap, explicit: Option<&str>) -> LocalePreference {
        let accept_language = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        LocalePreference::negotiate(explicit, accept_language, &self.default_locale)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/record/:provider/:record", get(record))
        .route("/record/:provider/:record/similar", get(similar))
        .route("/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until it fails.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState {
        repository: Repository::new(EuropeanaApi::from_config(config)),
        default_locale: config.default_locale.clone(),
    };

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("Server error")
}

// ==================== Errors ====================

pub struct AppError(ApiError);

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            error!("Europeana API failure: {}", self.0);
            StatusCode::BAD_GATEWAY
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ==================== Handlers ====================

#[derive(Debug, Deserialize)]
struct RecordQuery {
    fields: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimilarQuery {
    field: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: String,
    rows: Option<u32>,
    start: Option<u32>,
    locale: Option<String>,
}

async fn health() -> &'static str {
    "OK"
}

async fn record(
    State(state): State<AppState>,
    Path((provider, record)): Path<(String, String)>,
    Query(query): Query<RecordQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let locale = state.locale(&headers, query.locale.as_deref());
    let id = format!("{}/{}", provider, record);
    let doc = state.repository.find(&id, &Params::new()).await?.document;

    let mut fields = Map::new();
    let paths = query
        .fields
        .iter()
        .flat_map(|fields| fields.split(','))
        .map(str::trim)
        .filter(|path| !path.is_empty());
    for path in paths {
        let value = doc.fetch(path, &locale).to_value();
        fields.insert(path.to_string(), doc.dereference(&value, &locale));
    }

    Ok(Json(json!({
        "id": doc.to_param(),
        "locale": locale,
        "fields": fields,
        "document": doc,
    })))
}

async fn similar(
    State(state): State<AppState>,
    Path((provider, record)): Path<(String, String)>,
    Query(query): Query<SimilarQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let locale = state.locale(&headers, query.locale.as_deref());
    let id = format!("{}/{}", provider, record);
    let doc = state.repository.find(&id, &Params::new()).await?.document;

    let response = state
        .repository
        .more_like_this(&doc, query.field.as_deref(), &Params::new(), &locale)
        .await?;

    let items: Vec<Value> = response
        .map(|response| response.documents)
        .unwrap_or_default()
        .iter()
        .map(|doc| summary(doc, &locale))
        .collect();

    Ok(Json(json!({ "id": doc.to_param(), "items": items })))
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let locale = state.locale(&headers, query.locale.as_deref());

    let mut params = Params::from([("query".to_string(), query.query)]);
    if let Some(rows) = query.rows {
        params.insert("rows".to_string(), rows.to_string());
    }
    if let Some(start) = query.start {
        params.insert("start".to_string(), start.to_string());
    }

    let response = state.repository.search(&params).await?;
    let items: Vec<Value> = response
        .documents
        .iter()
        .map(|doc| summary(doc, &locale))
        .collect();

    Ok(Json(json!({
        "total_results": response.total_results,
        "items": items,
    })))
}

/// Short localized view of a search result.
fn summary(doc: &Document, locale: &LocalePreference) -> Value {
    json!({
        "id": doc.to_param(),
        "title": doc.fetch("title", locale),
        "type": doc.fetch("type", locale),
    })
}
