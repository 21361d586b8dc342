//! ContentDirectory service: Browse and Search dispatch.
//!
//! Each request goes through validate, route, invoke and assemble. Only a
//! malformed request fails; every routing or backend problem is logged and
//! answered with an empty listing, so a control point can't tell an empty
//! container from a failed lookup.

use crate::actions::{ActionArgs, ActionOutput, ServiceActions};
use crate::entry::{didl_document, DIDL_HEADER, DIDL_TRAILER};
use crate::error::{ActionError, DirectoryError, Result};
use crate::listing::{parse_sort_criteria, BrowseMode, ListingResult, PaginationWindow};
use crate::object_id::ObjectId;
use crate::registry::BackendRegistry;
use crate::root::RootListing;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";
pub const SERVICE_ID: &str = "urn:upnp-org:serviceId:ContentDirectory";

/// Placeholder update id; changes are not tracked
pub const UPDATE_ID: &str = "1";

pub const DEFAULT_SEARCH_CAPABILITIES: &str = "upnp:artist,dc:creator,upnp:album,dc:title";

const ACTIONS: &[&str] = &[
    "Browse",
    "Search",
    "GetSearchCapabilities",
    "GetSortCapabilities",
    "GetSystemUpdateID",
];

/// Validated Browse arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub object_id: ObjectId,
    pub browse_flag: String,
    /// Accepted and ignored
    pub filter: String,
    pub window: PaginationWindow,
    pub sort_criteria: String,
}

impl BrowseRequest {
    pub fn from_args(args: &ActionArgs) -> std::result::Result<Self, ActionError> {
        Ok(Self {
            object_id: ObjectId::new(required_str(args, "Browse", "ObjectID")?),
            browse_flag: required_str(args, "Browse", "BrowseFlag")?.to_string(),
            filter: required_str(args, "Browse", "Filter")?.to_string(),
            window: PaginationWindow::new(
                required_int(args, "Browse", "StartingIndex")?,
                required_int(args, "Browse", "RequestedCount")?,
            ),
            sort_criteria: required_str(args, "Browse", "SortCriteria")?.to_string(),
        })
    }

    pub fn mode(&self) -> BrowseMode {
        BrowseMode::from_flag(&self.browse_flag)
    }
}

/// Validated Search arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub container_id: ObjectId,
    pub search_criteria: String,
    /// Accepted and ignored
    pub filter: String,
    pub window: PaginationWindow,
    pub sort_criteria: String,
}

impl SearchRequest {
    pub fn from_args(args: &ActionArgs) -> std::result::Result<Self, ActionError> {
        Ok(Self {
            container_id: ObjectId::new(required_str(args, "Search", "ContainerID")?),
            search_criteria: required_str(args, "Search", "SearchCriteria")?.to_string(),
            filter: required_str(args, "Search", "Filter")?.to_string(),
            window: PaginationWindow::new(
                required_int(args, "Search", "StartingIndex")?,
                required_int(args, "Search", "RequestedCount")?,
            ),
            sort_criteria: required_str(args, "Search", "SortCriteria")?.to_string(),
        })
    }
}

fn required_str<'a>(
    args: &'a ActionArgs,
    action: &str,
    name: &str,
) -> std::result::Result<&'a str, ActionError> {
    args.require_str(name).map_err(|e| {
        error!("ContentDirectory::{}: no {} in params", action, name);
        e
    })
}

fn required_int(args: &ActionArgs, action: &str, name: &str) -> std::result::Result<i64, ActionError> {
    args.require_int(name).map_err(|e| {
        error!("ContentDirectory::{}: no {} in params", action, name);
        e
    })
}

/// The four outputs of Browse and Search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryResponse {
    /// DIDL-Lite document
    pub result: String,
    pub number_returned: usize,
    pub total_matches: usize,
    pub update_id: String,
}

impl DirectoryResponse {
    /// `number_returned` is the real entry count; `total_matches` is whatever
    /// the answering source reported, even if the two disagree.
    pub fn from_listing(listing: &ListingResult) -> Result<Self> {
        Ok(Self {
            result: didl_document(&listing.entries)?,
            number_returned: listing.entries.len(),
            total_matches: listing.total_matches,
            update_id: UPDATE_ID.to_string(),
        })
    }

    /// Empty document, zero counts
    pub fn empty() -> Self {
        Self {
            result: format!("{DIDL_HEADER}{DIDL_TRAILER}"),
            number_returned: 0,
            total_matches: 0,
            update_id: UPDATE_ID.to_string(),
        }
    }

    pub fn into_output(self) -> ActionOutput {
        ActionOutput::new()
            .with("Result", self.result)
            .with("NumberReturned", self.number_returned.to_string())
            .with("TotalMatches", self.total_matches.to_string())
            .with("UpdateID", self.update_id)
    }
}

pub struct ContentDirectory {
    registry: Arc<BackendRegistry>,
    root: RootListing,
    search_capabilities: String,
    sort_capabilities: String,
}

impl ContentDirectory {
    /// Root children are the registry's known backends
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        let root = RootListing::new(registry.descriptors());
        Self {
            registry,
            root,
            search_capabilities: DEFAULT_SEARCH_CAPABILITIES.to_string(),
            sort_capabilities: String::new(),
        }
    }

    pub fn with_capabilities(mut self, search: impl Into<String>, sort: impl Into<String>) -> Self {
        self.search_capabilities = search.into();
        self.sort_capabilities = sort.into();
        self
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    pub fn root(&self) -> &RootListing {
        &self.root
    }

    pub async fn browse(&self, req: &BrowseRequest) -> DirectoryResponse {
        debug!(
            "ContentDirectory::browse: ObjectID {} BrowseFlag {} Filter {} StartingIndex {} RequestedCount {} SortCriteria {}",
            req.object_id,
            req.browse_flag,
            req.filter,
            req.window.starting_index,
            req.window.requested_count,
            req.sort_criteria
        );

        let listing = self.fetch_browse(req).await.unwrap_or_else(|e| {
            error!(object_id = %req.object_id, "ContentDirectory::browse: {}", e);
            ListingResult::empty()
        });
        respond(&listing)
    }

    pub async fn search(&self, req: &SearchRequest) -> DirectoryResponse {
        debug!(
            "ContentDirectory::search: ContainerID {} SearchCriteria {} Filter {} StartingIndex {} RequestedCount {} SortCriteria {}",
            req.container_id,
            req.search_criteria,
            req.filter,
            req.window.starting_index,
            req.window.requested_count,
            req.sort_criteria
        );

        let listing = self.fetch_search(req).await.unwrap_or_else(|e| {
            error!(container_id = %req.container_id, "ContentDirectory::search: {}", e);
            ListingResult::empty()
        });
        respond(&listing)
    }

    async fn fetch_browse(&self, req: &BrowseRequest) -> Result<ListingResult> {
        // The root answers itself, in either mode
        if req.object_id.is_root() {
            return Ok(self.root.list(req.window));
        }

        let name = req.object_id.backend_name()?;
        debug!("ContentDirectory::browse: backend [{}]", name);
        let backend = self.registry.try_resolve(name).await?;
        let sort_criteria = parse_sort_criteria(&req.sort_criteria);
        let mut listing = backend
            .browse(&req.object_id, req.window, &sort_criteria, req.mode())
            .await?;
        cap_page(name, req.window, &mut listing);
        Ok(listing)
    }

    async fn fetch_search(&self, req: &SearchRequest) -> Result<ListingResult> {
        if req.container_id.is_root() {
            return Err(DirectoryError::RootNotSearchable);
        }

        let name = req.container_id.backend_name()?;
        debug!("ContentDirectory::search: backend [{}]", name);
        let backend = self.registry.try_resolve(name).await?;
        let sort_criteria = parse_sort_criteria(&req.sort_criteria);
        let mut listing = backend
            .search(
                &req.container_id,
                req.window,
                &req.search_criteria,
                &sort_criteria,
            )
            .await?;
        cap_page(name, req.window, &mut listing);
        Ok(listing)
    }
}

fn respond(listing: &ListingResult) -> DirectoryResponse {
    DirectoryResponse::from_listing(listing).unwrap_or_else(|e| {
        error!("ContentDirectory: can't serialize listing: {}", e);
        DirectoryResponse::empty()
    })
}

/// A page never holds more than the requested count
fn cap_page(backend: &str, window: PaginationWindow, listing: &mut ListingResult) {
    let returned = listing.entries.len();
    window.truncate_page(&mut listing.entries);
    if listing.entries.len() < returned {
        warn!(
            backend = backend,
            "ContentDirectory: backend returned {} entries for RequestedCount {}",
            returned,
            window.requested_count
        );
    }
}

#[async_trait]
impl ServiceActions for ContentDirectory {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn service_id(&self) -> &str {
        SERVICE_ID
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    async fn invoke(
        &self,
        action: &str,
        args: &ActionArgs,
    ) -> std::result::Result<ActionOutput, ActionError> {
        match action {
            "Browse" => {
                let req = BrowseRequest::from_args(args)?;
                Ok(self.browse(&req).await.into_output())
            }
            "Search" => {
                let req = SearchRequest::from_args(args)?;
                Ok(self.search(&req).await.into_output())
            }
            "GetSearchCapabilities" => {
                Ok(ActionOutput::new().with("SearchCaps", self.search_capabilities.clone()))
            }
            "GetSortCapabilities" => {
                Ok(ActionOutput::new().with("SortCaps", self.sort_capabilities.clone()))
            }
            "GetSystemUpdateID" => Ok(ActionOutput::new().with("Id", UPDATE_ID)),
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}
