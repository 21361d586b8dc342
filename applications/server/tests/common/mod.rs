//! Test fixtures: an in-memory backend and an app wired around it

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use soul_directory::{
    Backend, BackendContext, BackendFactory, BackendRegistry, BrowseMode, ConnectionManager,
    ContentDirectory, FileOps, FixedAddress, ListingEntry, ListingResult, ObjectId,
    PaginationWindow, VirtualDir, VirtualResource,
};
use soul_directory_server::{api, state::AppState};
use std::path::PathBuf;
use std::sync::Arc;

pub const HOST_PORT: &str = "10.0.0.5:49152";

/// Backend with a fixed number of tracks and a `/track` redirect endpoint
pub struct StaticBackend {
    name: String,
    tracks: Vec<ListingEntry>,
}

impl StaticBackend {
    fn new(ctx: &BackendContext, track_count: usize) -> Self {
        let parent = ObjectId::for_backend(&ctx.name, "");
        let tracks = (0..track_count)
            .map(|i| {
                ListingEntry::item(
                    ObjectId::for_backend(&ctx.name, &format!("/{i}")),
                    parent.clone(),
                    format!("Song {i}"),
                )
            })
            .collect();
        Self {
            name: ctx.name.clone(),
            tracks,
        }
    }
}

struct RedirectOps;

#[async_trait]
impl FileOps for RedirectOps {
    async fn open(&self, path: &str, query: Option<&str>) -> soul_directory::Result<VirtualResource> {
        match path {
            "/track" => Ok(VirtualResource::Redirect(format!(
                "https://media.example.com/stream?{}",
                query.unwrap_or_default()
            ))),
            "/cover.txt" => Ok(VirtualResource::Content {
                mime: "text/plain".to_string(),
                body: b"cover".to_vec(),
            }),
            other => Err(soul_directory::DirectoryError::backend(
                "static",
                format!("no such file {other}"),
            )),
        }
    }
}

#[async_trait]
impl Backend for StaticBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn browse(
        &self,
        _id: &ObjectId,
        window: PaginationWindow,
        _sort_criteria: &[String],
        _mode: BrowseMode,
    ) -> soul_directory::Result<ListingResult> {
        Ok(ListingResult::new(window.apply(&self.tracks), self.tracks.len()))
    }

    async fn search(
        &self,
        _container_id: &ObjectId,
        _window: PaginationWindow,
        _search_criteria: &str,
        _sort_criteria: &[String],
    ) -> soul_directory::Result<ListingResult> {
        Ok(ListingResult::empty())
    }

    fn file_ops(&self) -> Option<Arc<dyn FileOps>> {
        Some(Arc::new(RedirectOps))
    }
}

pub struct StaticFactory {
    pub track_count: usize,
}

#[async_trait]
impl BackendFactory for StaticFactory {
    fn title(&self) -> &str {
        "Static Music"
    }

    async fn create(&self, ctx: BackendContext) -> soul_directory::Result<Arc<dyn Backend>> {
        Ok(Arc::new(StaticBackend::new(&ctx, self.track_count)))
    }
}

/// State with one backend named "static"
pub fn create_test_state(track_count: usize) -> AppState {
    let registry = BackendRegistry::new(
        Arc::new(FixedAddress(HOST_PORT.to_string())),
        Arc::new(VirtualDir::new()),
        PathBuf::from("/tmp/soul-directory-test"),
    )
    .with_factory("static", Arc::new(StaticFactory { track_count }));

    AppState::new(
        ContentDirectory::new(Arc::new(registry)),
        ConnectionManager::default(),
    )
}

pub fn create_test_app(track_count: usize) -> (Router, AppState) {
    let state = create_test_state(track_count);
    (api::create_router(state.clone()), state)
}
