//! Repository: record lookup and search against the Europeana API.

use tracing::{debug, info};

use crate::api::{ApiError, EuropeanaApi, Params};
use crate::document::Document;
use crate::i18n::LocalePreference;
use crate::response::{RecordResponse, SearchResponse};

/// Number of similar items fetched by [`Repository::more_like_this`].
pub const MORE_LIKE_THIS_ROWS: u32 = 4;

#[derive(Clone)]
pub struct Repository {
    api: EuropeanaApi,
}

impl Repository {
    pub fn new(api: EuropeanaApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &EuropeanaApi {
        &self.api
    }

    /// Find a single record. `id` may omit its leading slash.
    pub async fn find(&self, id: &str, params: &Params) -> Result<RecordResponse, ApiError> {
        let id = if id.starts_with('/') {
            id.to_string()
        } else {
            format!("/{}", id)
        };

        debug!("Finding record {}", id);
        let json = self.api.record(&id, params).await?;
        RecordResponse::from_json(json, params.clone())
    }

    pub async fn search(&self, params: &Params) -> Result<SearchResponse, ApiError> {
        let json = self.api.search(params).await?;
        let response = SearchResponse::from_json(json, params.clone());
        info!(
            "Search returned {} of {} results",
            response.documents.len(),
            response.total_results
        );
        Ok(response)
    }

    /// Search for items similar to `doc`.
    ///
    /// Returns `None`, without calling the API, when the document has no
    /// metadata to build a query from. `params` override the defaults
    /// (`rows`, `profile`, and even `query`).
    pub async fn more_like_this(
        &self,
        doc: &Document,
        field: Option<&str>,
        params: &Params,
        locale: &LocalePreference,
    ) -> Result<Option<SearchResponse>, ApiError> {
        let Some(query) = doc.more_like_this_query(field, locale) else {
            debug!("No more-like-this query for {:?}", doc.id());
            return Ok(None);
        };

        let mut mlt_params = Params::from([
            ("query".to_string(), query),
            ("rows".to_string(), MORE_LIKE_THIS_ROWS.to_string()),
            ("profile".to_string(), "rich".to_string()),
        ]);
        mlt_params.extend(params.clone());

        self.search(&mlt_params).await.map(Some)
    }
}
