use crate::store::{Document, Query, Write};
use crate::Result;
use async_trait::async_trait;
use tokio::sync::watch;

/// Common trait for all document store backends.
/// The hosted store and the in-memory store both implement it, so the
/// data service does not care where documents live.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Run a filtered, ordered query over one collection
    async fn run_query(&self, query: &Query) -> Result<Vec<Document>>;

    /// Apply all writes atomically
    async fn commit(&self, writes: Vec<Write>) -> Result<()>;

    /// Credentials for subsequent requests; `None` drops back to anonymous
    fn set_id_token(&self, _token: Option<String>) {}

    /// Change counter bumped on every commit, if the backend can push.
    /// Subscriptions fall back to polling when this is `None`.
    fn changes(&self) -> Option<watch::Receiver<u64>> {
        None
    }

    /// Get the name of the backend
    fn backend_name(&self) -> &'static str;
}
