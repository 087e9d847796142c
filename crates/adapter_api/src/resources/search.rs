//! Backend quick search.

use async_trait::async_trait;
use serde::Deserialize;
use targeting_core::search::{SearchHit, SearchKind};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct SearchHitRecord {
    title: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    subtitle: Option<String>,
}

impl SearchHitRecord {
    fn into_hit(self) -> Option<SearchHit> {
        let kind = match self.kind.to_ascii_lowercase().as_str() {
            "page" => SearchKind::Page,
            "target" => SearchKind::Target,
            "unit" => SearchKind::Unit,
            "bda_report" | "report" => SearchKind::Report,
            other => {
                debug!(kind = other, path = %self.path, "Skipping search hit of unknown type");
                return None;
            }
        };
        if self.path.is_empty() {
            return None;
        }
        Some(SearchHit {
            title: self.title,
            path: self.path,
            kind,
            subtitle: self.subtitle.filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Wrapped { results: Vec<SearchHitRecord> },
    Bare(Vec<SearchHitRecord>),
}

impl SearchResponse {
    fn into_hits(self) -> Vec<SearchHit> {
        let records = match self {
            SearchResponse::Wrapped { results } | SearchResponse::Bare(results) => results,
        };
        records.into_iter().filter_map(SearchHitRecord::into_hit).collect()
    }
}

/// Something that can answer a quick-search query.
///
/// The search driver only depends on this trait, so tests can substitute a
/// scripted backend with controlled latency.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Hits for `query`, in backend relevance order
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError>;
}

/// Search endpoint
#[derive(Debug, Clone, Copy)]
pub struct SearchApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    /// Search endpoint
    pub fn search_api(&self) -> SearchApi<'_> {
        SearchApi { client: self }
    }
}

impl SearchApi<'_> {
    /// `GET /search?q=`
    pub async fn query(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let response: SearchResponse = self
            .client
            .get_with_query(&["search"], &[("q", query)])
            .await?;
        Ok(response.into_hits())
    }
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        self.search_api().query(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_types_are_skipped() {
        let response: SearchResponse = serde_json::from_value(json!({
            "results": [
                {"title": "Bridge", "path": "/targets/T-1", "type": "target", "subtitle": "P1"},
                {"title": "Memo", "path": "/docs/9", "type": "document"},
                {"title": "BDA-3", "path": "/bda/BDA-3", "type": "bda_report", "subtitle": ""}
            ]
        }))
        .unwrap();

        let hits = response.into_hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, SearchKind::Target);
        assert_eq!(hits[0].subtitle.as_deref(), Some("P1"));
        assert_eq!(hits[1].kind, SearchKind::Report);
        assert_eq!(hits[1].subtitle, None);
    }

    #[test]
    fn test_bare_array_accepted() {
        let response: SearchResponse =
            serde_json::from_value(json!([{"title": "1 BDE", "path": "/orbat/1BDE", "type": "unit"}])).unwrap();
        assert_eq!(response.into_hits()[0].kind, SearchKind::Unit);
    }
}
