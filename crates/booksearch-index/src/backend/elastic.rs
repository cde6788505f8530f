//! Elasticsearch implementation of [`Backend`].

use std::collections::HashMap;

use async_trait::async_trait;
use booksearch_config::BackendSettings;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::{Backend, BackendInfo, BackendQuery, Hit};
use crate::{Book, SearchError};

/// Longest response body kept in a [`SearchError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Elasticsearch gateway over the REST API.
///
/// Construct with [`ElasticBackend::connect`] to wait for the cluster to become healthy, or
/// with [`ElasticBackend::new`] to skip the health check.
#[derive(Debug, Clone)]
pub struct ElasticBackend {
    /// Shared HTTP client.
    client: Client,
    /// Cluster base URL.
    base_url: Url,
    /// Index holding the books.
    index: String,
}

impl ElasticBackend {
    /// Creates a gateway without contacting the backend.
    pub fn new(settings: &BackendSettings) -> Result<Self, SearchError> {
        let base_url = Url::parse(&settings.url).map_err(|err| SearchError::InvalidUrl {
            url: settings.url.clone(),
            reason: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::InvalidUrl {
                url: settings.url.clone(),
                reason: "not a base url".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|source| SearchError::Transport {
                url: settings.url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            index: settings.index.clone(),
        })
    }

    /// Creates a gateway and waits until the backend answers a health check.
    ///
    /// Tries `connect_attempts` times (at least once), sleeping `retry_delay` between
    /// attempts, and fails with [`SearchError::Unavailable`] after the last one.
    #[instrument(skip(settings), fields(url = %settings.url))]
    pub async fn connect(settings: &BackendSettings) -> Result<Self, SearchError> {
        let backend = Self::new(settings)?;
        let attempts = settings.connect_attempts.max(1);

        for attempt in 1..=attempts {
            match backend.ping().await {
                Ok(info) => {
                    info!(
                        attempt,
                        cluster = info.cluster_name.as_deref().unwrap_or("unknown"),
                        "connected to backend"
                    );
                    return Ok(backend);
                }
                Err(err) => {
                    warn!(attempt, attempts, error = %err, "backend not ready");
                    if attempt < attempts {
                        sleep(settings.retry_delay).await;
                    }
                }
            }
        }

        Err(SearchError::Unavailable {
            url: settings.url.clone(),
            attempts,
        })
    }

    /// Returns the index this gateway reads and writes.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Returns the cluster base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds a URL below the base URL from unescaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SearchError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base url".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Returns the URL of one stored document.
    fn document_url(&self, id: &str) -> Result<Url, SearchError> {
        self.endpoint(&[&self.index, "_doc", id])
    }
}

/// Builds the `_search` request body for a query.
pub fn search_body(query: &BackendQuery) -> Value {
    let mut fields = Map::new();
    fields.insert(query.query.field().to_string(), json!({}));

    json!({
        "from": 0,
        "size": query.size,
        "track_scores": false,
        "query": query.query.to_value(),
        "highlight": {
            "type": "plain",
            "pre_tags": [query.markers.open()],
            "post_tags": [query.markers.close()],
            "fields": Value::Object(fields),
        },
    })
}

/// Sends a request, mapping transport failures.
async fn send(request: RequestBuilder, url: &Url) -> Result<Response, SearchError> {
    request.send().await.map_err(|source| SearchError::Transport {
        url: url.to_string(),
        source,
    })
}

/// Turns a non-success response into [`SearchError::Status`].
async fn ensure_success(response: Response, url: &Url) -> Result<Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SearchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: truncate_body(body),
    })
}

/// Reads and decodes a JSON response body.
async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, SearchError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| SearchError::Transport {
            url: url.to_string(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|err| SearchError::Malformed {
        url: url.to_string(),
        message: err.to_string(),
    })
}

/// Shortens an error body to [`MAX_ERROR_BODY`] bytes on a char boundary.
fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let end = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(end);
        body.push_str("...");
    }
    body
}

/// `_search` response.
#[derive(Deserialize)]
struct SearchResponseBody {
    /// Hit envelope.
    hits: HitsEnvelope,
}

/// `hits` object of a `_search` response.
#[derive(Deserialize)]
struct HitsEnvelope {
    /// Matching documents.
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// One entry of `hits.hits`.
#[derive(Deserialize)]
struct RawHit {
    /// Document id.
    #[serde(rename = "_id")]
    id: String,
    /// Stored document.
    #[serde(rename = "_source", default)]
    source: Value,
    /// Highlighted fragments by field.
    #[serde(default)]
    highlight: HashMap<String, Vec<String>>,
}

/// `_doc` GET response.
#[derive(Deserialize)]
struct GetResponseBody {
    /// Whether the document exists.
    #[serde(default)]
    found: bool,
    /// Stored document.
    #[serde(rename = "_source")]
    source: Option<Value>,
}

/// Cluster root response.
#[derive(Deserialize)]
struct RootResponse {
    /// Cluster name.
    cluster_name: Option<String>,
    /// Version block.
    version: Option<VersionInfo>,
}

/// `version` block of the root response.
#[derive(Deserialize)]
struct VersionInfo {
    /// Server version.
    number: Option<String>,
}

#[async_trait]
impl Backend for ElasticBackend {
    #[instrument(
        skip(self, query),
        fields(field = query.query.field(), terms = query.query.clauses().len(), size = query.size)
    )]
    async fn search(&self, query: &BackendQuery) -> Result<Vec<Hit>, SearchError> {
        let url = self.endpoint(&[&self.index, "_search"])?;
        let body = search_body(query);

        let response = send(self.client.post(url.clone()).json(&body), &url).await?;
        let response = ensure_success(response, &url).await?;
        let parsed: SearchResponseBody = decode(response, &url).await?;

        let field = query.query.field();
        let hits: Vec<Hit> = parsed
            .hits
            .hits
            .into_iter()
            .map(|mut raw| Hit {
                highlights: raw.highlight.remove(field).unwrap_or_default(),
                id: raw.id,
                source: raw.source,
            })
            .collect();

        debug!(hits = hits.len(), "search round returned");
        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn get_document(&self, id: &str) -> Result<Option<Book>, SearchError> {
        let url = self.document_url(id)?;
        let response = send(self.client.get(url.clone()), &url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, &url).await?;
        let parsed: GetResponseBody = decode(response, &url).await?;

        let Some(source) = parsed.source.filter(|_| parsed.found) else {
            return Ok(None);
        };
        let book = Book::deserialize(&source).map_err(|err| SearchError::Malformed {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        Ok(Some(book))
    }

    #[instrument(skip(self, book), fields(id = %book.id))]
    async fn index_document(&self, book: &Book) -> Result<(), SearchError> {
        let url = self.document_url(&book.id)?;
        let body = serde_json::to_value(book)?;
        let response = send(self.client.put(url.clone()).json(&body), &url).await?;
        ensure_success(response, &url).await?;
        info!("document indexed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, id: &str) -> Result<bool, SearchError> {
        let url = self.document_url(id)?;
        let response = send(self.client.delete(url.clone()), &url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(response, &url).await?;
        info!("document deleted");
        Ok(true)
    }

    async fn ping(&self) -> Result<BackendInfo, SearchError> {
        let url = self.base_url.clone();
        let response = send(self.client.get(url.clone()), &url).await?;
        let response = ensure_success(response, &url).await?;
        let root: RootResponse = decode(response, &url).await?;
        Ok(BackendInfo {
            cluster_name: root.cluster_name,
            version: root.version.and_then(|v| v.number),
        })
    }
}

#[cfg(test)]
mod tests {
    use booksearch_query::{ProximityQuery, split_terms};
    use booksearch_score::Markers;

    use super::*;

    fn settings(url: &str) -> BackendSettings {
        BackendSettings {
            url: url.to_string(),
            ..BackendSettings::default()
        }
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(matches!(
            ElasticBackend::new(&settings("not a url")),
            Err(SearchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ElasticBackend::new(&settings("localhost:9200")),
            Err(SearchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn endpoints_escape_ids() {
        let backend = ElasticBackend::new(&settings("http://localhost:9200")).unwrap();
        let url = backend.document_url("a/b c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/books/_doc/a%2Fb%20c");
    }

    #[test]
    fn endpoints_keep_base_path() {
        let backend = ElasticBackend::new(&settings("https://proxy.example/es/")).unwrap();
        let url = backend.endpoint(&["books", "_search"]).unwrap();
        assert_eq!(url.as_str(), "https://proxy.example/es/books/_search");
    }

    #[test]
    fn search_body_highlights_searched_field() {
        let terms = split_terms("old mariner").unwrap();
        let query = BackendQuery {
            query: ProximityQuery::build(&terms, "title"),
            size: 30,
            markers: Markers::default(),
        };

        let body = search_body(&query);

        assert_eq!(body["size"], 30);
        assert_eq!(body["from"], 0);
        assert_eq!(body["track_scores"], false);
        assert_eq!(body["highlight"]["type"], "plain");
        assert_eq!(body["highlight"]["pre_tags"][0], "<em>");
        assert_eq!(body["highlight"]["post_tags"][0], "</em>");
        assert!(body["highlight"]["fields"].get("title").is_some());
        assert_eq!(body["query"]["span_near"]["slop"], 1);
    }

    #[test]
    fn truncates_long_bodies_on_char_boundary() {
        let body = "é".repeat(MAX_ERROR_BODY);
        let truncated = truncate_body(body);
        assert!(truncated.len() <= MAX_ERROR_BODY + 3);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short".to_string()), "short");
    }
}
