//! Shared test fixtures: an in-memory backend and instrumented factories

#![allow(dead_code)]

use async_trait::async_trait;
use soul_directory::{
    AddressProvider, Backend, BackendContext, BackendFactory, BackendRegistry, BrowseMode,
    ContentDirectory, DirectoryError, FileOps, FixedAddress, ListingEntry, ListingResult,
    ObjectId, PaginationWindow, Resource, VirtualDir, VirtualResource,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const HOST_PORT: &str = "192.168.1.20:49152";

/// Backend serving a flat album of `track_count` tracks under `0$<name>$`
pub struct MockBackend {
    pub name: String,
    pub ctx: BackendContext,
    pub tracks: Vec<ListingEntry>,
    /// Overrides the reported total when set
    pub reported_total: Option<usize>,
    /// Return every track regardless of the requested window
    pub ignore_window: bool,
    pub fail: bool,
    pub browse_calls: AtomicUsize,
    pub last_sort: Arc<Mutex<Vec<String>>>,
    pub last_mode: Arc<Mutex<Option<BrowseMode>>>,
    pub shutdowns: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new(ctx: BackendContext, track_count: usize) -> Self {
        let parent = ObjectId::for_backend(&ctx.name, "");
        let tracks = (0..track_count)
            .map(|i| {
                ListingEntry::item(
                    ObjectId::for_backend(&ctx.name, &format!("/track/{i}")),
                    parent.clone(),
                    format!("Track {i}"),
                )
                .with_property("upnp:artist", if i % 2 == 0 { "Even" } else { "Odd" })
                .with_resource(Resource::new(
                    ctx.callback_url(&format!("/track?id={i}")),
                    "audio/flac",
                ))
            })
            .collect();
        Self {
            name: ctx.name.clone(),
            ctx,
            tracks,
            reported_total: None,
            ignore_window: false,
            fail: false,
            browse_calls: AtomicUsize::new(0),
            last_sort: Arc::new(Mutex::new(Vec::new())),
            last_mode: Arc::new(Mutex::new(None)),
            shutdowns: Arc::new(AtomicUsize::new(0)),
        }
    }
}

struct MockFileOps;

#[async_trait]
impl FileOps for MockFileOps {
    async fn open(&self, path: &str, query: Option<&str>) -> soul_directory::Result<VirtualResource> {
        Ok(VirtualResource::Redirect(format!(
            "https://cdn.example.com{}?{}",
            path,
            query.unwrap_or_default()
        )))
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn browse(
        &self,
        id: &ObjectId,
        window: PaginationWindow,
        sort_criteria: &[String],
        mode: BrowseMode,
    ) -> soul_directory::Result<ListingResult> {
        self.browse_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_sort.lock().unwrap() = sort_criteria.to_vec();
        *self.last_mode.lock().unwrap() = Some(mode);
        if self.fail {
            return Err(DirectoryError::backend(&self.name, "upstream timed out"));
        }
        if mode == BrowseMode::Metadata {
            let entry = self
                .tracks
                .iter()
                .find(|t| &t.id == id)
                .cloned()
                .unwrap_or_else(|| ListingEntry::container(id.clone(), ObjectId::root(), "Album"));
            return Ok(ListingResult::new(vec![entry], 1));
        }
        let total = self.reported_total.unwrap_or(self.tracks.len());
        if self.ignore_window {
            return Ok(ListingResult::new(self.tracks.clone(), total));
        }
        Ok(ListingResult::new(window.apply(&self.tracks), total))
    }

    async fn search(
        &self,
        _container_id: &ObjectId,
        window: PaginationWindow,
        search_criteria: &str,
        _sort_criteria: &[String],
    ) -> soul_directory::Result<ListingResult> {
        if self.fail {
            return Err(DirectoryError::backend(&self.name, "upstream timed out"));
        }
        let matches: Vec<ListingEntry> = self
            .tracks
            .iter()
            .filter(|t| {
                t.properties
                    .get("upnp:artist")
                    .is_some_and(|artist| search_criteria.contains(artist.as_str()))
            })
            .cloned()
            .collect();
        if self.ignore_window {
            return Ok(ListingResult::new(matches.clone(), matches.len()));
        }
        Ok(ListingResult::new(window.apply(&matches), matches.len()))
    }

    fn file_ops(&self) -> Option<Arc<dyn FileOps>> {
        Some(Arc::new(MockFileOps))
    }

    async fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory counting constructions, slow enough to make races observable
pub struct CountingFactory {
    pub title: String,
    pub track_count: usize,
    pub reported_total: Option<usize>,
    pub ignore_window: bool,
    pub fail_backend: bool,
    pub fail_create: bool,
    pub delay: Duration,
    pub created: AtomicUsize,
    pub contexts: Mutex<Vec<BackendContext>>,
    pub shutdowns: Arc<AtomicUsize>,
    pub last_sort: Arc<Mutex<Vec<String>>>,
    pub last_mode: Arc<Mutex<Option<BrowseMode>>>,
}

impl CountingFactory {
    pub fn new(title: &str, track_count: usize) -> Self {
        Self {
            title: title.to_string(),
            track_count,
            reported_total: None,
            ignore_window: false,
            fail_backend: false,
            fail_create: false,
            delay: Duration::from_millis(0),
            created: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
            shutdowns: Arc::new(AtomicUsize::new(0)),
            last_sort: Arc::new(Mutex::new(Vec::new())),
            last_mode: Arc::new(Mutex::new(None)),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendFactory for CountingFactory {
    fn title(&self) -> &str {
        &self.title
    }

    async fn create(&self, ctx: BackendContext) -> soul_directory::Result<Arc<dyn Backend>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_create {
            return Err(DirectoryError::backend(&ctx.name, "credentials missing"));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(ctx.clone());

        let mut backend = MockBackend::new(ctx, self.track_count);
        backend.reported_total = self.reported_total;
        backend.ignore_window = self.ignore_window;
        backend.fail = self.fail_backend;
        backend.shutdowns = Arc::clone(&self.shutdowns);
        backend.last_sort = Arc::clone(&self.last_sort);
        backend.last_mode = Arc::clone(&self.last_mode);
        Ok(Arc::new(backend))
    }
}

/// Address provider that never finds an address
pub struct NoAddress {
    pub attempts: AtomicUsize,
}

impl NoAddress {
    pub fn new() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AddressProvider for NoAddress {
    async fn host_port(&self) -> soul_directory::Result<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DirectoryError::address_discovery("no interface"))
    }
}

pub fn registry_with(factories: Vec<(&str, Arc<CountingFactory>)>) -> BackendRegistry {
    let mut registry = BackendRegistry::new(
        Arc::new(FixedAddress(HOST_PORT.to_string())),
        Arc::new(VirtualDir::new()),
        PathBuf::from("/var/lib/soul-directory"),
    );
    for (name, factory) in factories {
        registry = registry.with_factory(name, factory);
    }
    registry
}

/// Directory with a single "tidal" backend backed by `factory`
pub fn directory_with(factory: Arc<CountingFactory>) -> ContentDirectory {
    ContentDirectory::new(Arc::new(registry_with(vec![("tidal", factory)])))
}
