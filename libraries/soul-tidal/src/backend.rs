/// Tidal implementation of the backend contract
use crate::error::TidalError;
use crate::helper::{BrowseQuery, HelperClient, HelperEntry, HelperListing, SearchQuery};
use crate::BACKEND_NAME;
use async_trait::async_trait;
use soul_directory::{
    Backend, BackendContext, BrowseMode, FileOps, ListingEntry, ListingResult, ObjectId,
    PaginationWindow, Resource, VirtualResource,
};
use std::sync::Arc;
use tracing::{debug, warn};
use url::form_urlencoded;

const DEFAULT_MIME: &str = "audio/flac";

pub struct TidalBackend {
    ctx: BackendContext,
    helper: HelperClient,
    file_ops: Arc<TidalFileOps>,
}

impl TidalBackend {
    pub fn new(ctx: BackendContext, helper: HelperClient) -> Self {
        let file_ops = Arc::new(TidalFileOps {
            helper: helper.clone(),
        });
        Self {
            ctx,
            helper,
            file_ops,
        }
    }

    /// Build a listing entry, routing ids and media URLs back through us
    fn to_entry(&self, entry: HelperEntry) -> ListingEntry {
        let id = ObjectId::for_backend(&self.ctx.name, &entry.id);
        let parent_id = ObjectId::for_backend(&self.ctx.name, &entry.pid);

        if entry.tp == "ct" {
            let container = ListingEntry::container(id, parent_id, entry.title);
            return match entry.upnpclass {
                Some(class) => container.with_class(class),
                None => container,
            };
        }

        let mut item = ListingEntry::item(id, parent_id, entry.title);
        if let Some(class) = entry.upnpclass {
            item = item.with_class(class);
        }
        if let Some(artist) = entry.artist {
            item = item
                .with_property("dc:creator", artist.clone())
                .with_property("upnp:artist", artist);
        }
        if let Some(album) = entry.album {
            item = item.with_property("upnp:album", album);
        }
        if let Some(tracknum) = entry.tracknum {
            item = item.with_property("upnp:originalTrackNumber", tracknum.to_string());
        }
        if let Some(art) = entry.art {
            item = item.with_property("upnp:albumArtURI", art);
        }
        if let Some(track_id) = entry.trackid {
            let encoded: String = form_urlencoded::byte_serialize(track_id.as_bytes()).collect();
            let mut resource = Resource::new(
                self.ctx.callback_url(&format!("/track?id={encoded}")),
                entry.mime.as_deref().unwrap_or(DEFAULT_MIME),
            );
            if let Some(secs) = entry.duration {
                resource = resource.with_duration_secs(secs);
            }
            item = item.with_resource(resource);
        }
        item
    }

    /// Map a helper page, trimmed to the requested window
    fn to_listing(&self, listing: HelperListing, window: PaginationWindow) -> ListingResult {
        let total = listing.total;
        let mut entries: Vec<ListingEntry> = listing
            .entries
            .into_iter()
            .filter(|e| {
                let known = e.tp == "ct" || e.tp == "it";
                if !known {
                    warn!("Tidal: dropping entry {} of unknown type [{}]", e.id, e.tp);
                }
                known
            })
            .map(|e| self.to_entry(e))
            .collect();
        window.truncate_page(&mut entries);
        ListingResult::new(entries, total)
    }
}

#[async_trait]
impl Backend for TidalBackend {
    fn name(&self) -> &str {
        &self.ctx.name
    }

    async fn browse(
        &self,
        id: &ObjectId,
        window: PaginationWindow,
        sort_criteria: &[String],
        mode: BrowseMode,
    ) -> soul_directory::Result<ListingResult> {
        let objid = id.local_path()?;
        let flag = match mode {
            BrowseMode::Metadata => "meta",
            BrowseMode::DirectChildren => "children",
        };
        let listing = self
            .helper
            .browse(&BrowseQuery {
                objid,
                offset: window.starting_index,
                count: window.requested_count,
                sort: sort_criteria,
                flag,
            })
            .await?;
        debug!("Tidal::browse: {} entries, total {}", listing.entries.len(), listing.total);
        Ok(self.to_listing(listing, window))
    }

    async fn search(
        &self,
        container_id: &ObjectId,
        window: PaginationWindow,
        search_criteria: &str,
        sort_criteria: &[String],
    ) -> soul_directory::Result<ListingResult> {
        let objid = container_id.local_path()?;
        let listing = self
            .helper
            .search(&SearchQuery {
                objid,
                offset: window.starting_index,
                count: window.requested_count,
                sort: sort_criteria,
                criteria: search_criteria,
            })
            .await?;
        debug!("Tidal::search: {} entries, total {}", listing.entries.len(), listing.total);
        Ok(self.to_listing(listing, window))
    }

    fn file_ops(&self) -> Option<Arc<dyn FileOps>> {
        Some(Arc::clone(&self.file_ops) as Arc<dyn FileOps>)
    }
}

/// Serves `/tidal/track?id=...` by redirecting to the streaming URL
pub struct TidalFileOps {
    helper: HelperClient,
}

#[async_trait]
impl FileOps for TidalFileOps {
    async fn open(&self, path: &str, query: Option<&str>) -> soul_directory::Result<VirtualResource> {
        if path != "/track" {
            return Err(TidalError::NotFound(path.to_string()).into());
        }
        let track_id = query
            .and_then(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .find(|(name, _)| name == "id")
                    .map(|(_, value)| value.into_owned())
            })
            .ok_or_else(|| TidalError::NotFound(format!("{BACKEND_NAME}{path} without id")))?;

        let uri = self.helper.track_uri(&track_id).await?;
        debug!("Tidal: track {} -> {}", track_id, uri);
        Ok(VirtualResource::Redirect(uri))
    }
}
