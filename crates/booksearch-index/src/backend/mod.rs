//! Search backend gateway.
//!
//! The pipeline only needs the [`Backend`] capability: run a proximity query and return
//! highlighted hits, plus plain document CRUD for the command-line surface.
//! [`ElasticBackend`] is the production implementation.

mod elastic;

use async_trait::async_trait;
use booksearch_query::ProximityQuery;
use booksearch_score::Markers;
pub use elastic::ElasticBackend;
pub use elastic::search_body;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Book, SearchError};

/// One query sent to the backend.
#[derive(Debug, Clone)]
pub struct BackendQuery {
    /// Proximity query; its field is also the highlighted field.
    pub query: ProximityQuery,
    /// Maximum hits to return.
    pub size: usize,
    /// Markers the backend should wrap matched text in.
    pub markers: Markers,
}

/// A raw backend hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Backend document id.
    pub id: String,
    /// Stored document, undecoded.
    pub source: Value,
    /// Highlighted snippets for the searched field, in backend order.
    pub highlights: Vec<String>,
}

impl Hit {
    /// Decodes the stored document.
    pub fn book(&self) -> Result<Book, serde_json::Error> {
        Book::deserialize(&self.source)
    }
}

/// Basic facts reported by a healthy backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    /// Cluster name, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// Server version, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Operations the search pipeline and CLI need from a search backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Runs a proximity query and returns highlighted hits.
    async fn search(&self, query: &BackendQuery) -> Result<Vec<Hit>, SearchError>;

    /// Fetches a stored document, or `None` if the id is unknown.
    async fn get_document(&self, id: &str) -> Result<Option<Book>, SearchError>;

    /// Creates or replaces a document under its id.
    async fn index_document(&self, book: &Book) -> Result<(), SearchError>;

    /// Deletes a document. Returns false if the id was unknown.
    async fn delete_document(&self, id: &str) -> Result<bool, SearchError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<BackendInfo, SearchError>;
}
