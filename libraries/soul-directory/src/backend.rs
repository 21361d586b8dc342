/// Backend contract
use crate::error::Result;
use crate::listing::{BrowseMode, ListingResult, PaginationWindow};
use crate::object_id::ObjectId;
use crate::vdir::FileOps;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// A pluggable content source
///
/// One instance per backend name lives in the registry and is shared by all
/// requests, so implementations must tolerate concurrent `browse`/`search`
/// calls. Every id a backend hands out must decode to its own name via
/// [`ObjectId::backend_name`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Name used in object ids (`0$<name>$...`)
    fn name(&self) -> &str;

    /// List the children of `id`, or describe `id` itself in metadata mode
    ///
    /// `sort_criteria` is a hint; the dispatcher never re-sorts.
    async fn browse(
        &self,
        id: &ObjectId,
        window: PaginationWindow,
        sort_criteria: &[String],
        mode: BrowseMode,
    ) -> Result<ListingResult>;

    /// Search below `container_id`; the criteria string is passed as received
    async fn search(
        &self,
        container_id: &ObjectId,
        window: PaginationWindow,
        search_criteria: &str,
        sort_criteria: &[String],
    ) -> Result<ListingResult>;

    /// Handler for this backend's URL space, mounted at `/<name>`
    fn file_ops(&self) -> Option<Arc<dyn FileOps>> {
        None
    }

    /// Release resources before the registry drops the instance
    async fn shutdown(&self) {}
}

/// What a backend gets to know about the service at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendContext {
    pub name: String,
    /// `host:port` control points can reach this service on
    pub host_port: String,
    /// Path prefix of the backend's virtual directory (`/tidal`)
    pub url_prefix: String,
    /// Backend-private data directory
    pub data_dir: PathBuf,
}

impl BackendContext {
    /// Absolute callback URL for a path under the backend's prefix
    pub fn callback_url(&self, path: &str) -> String {
        format!("http://{}{}{}", self.host_port, self.url_prefix, path)
    }
}
