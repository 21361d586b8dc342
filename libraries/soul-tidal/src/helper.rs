//! HTTP client for the catalog helper process.
//!
//! The helper owns the streaming service session; this side only forwards
//! browse/search windows and maps the replies.

use crate::error::{Result, TidalError};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Serialize)]
pub(crate) struct BrowseQuery<'a> {
    pub objid: &'a str,
    pub offset: i64,
    pub count: i64,
    pub sort: &'a [String],
    /// `meta` or `children`
    pub flag: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchQuery<'a> {
    pub objid: &'a str,
    pub offset: i64,
    pub count: i64,
    pub sort: &'a [String],
    pub criteria: &'a str,
}

/// One node as the helper describes it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelperEntry {
    /// `ct` for containers, `it` for items
    pub tp: String,
    /// Backend-local path
    pub id: String,
    /// Backend-local path of the parent; empty for top-level nodes
    #[serde(default)]
    pub pid: String,
    pub title: String,
    #[serde(default)]
    pub upnpclass: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub tracknum: Option<u32>,
    #[serde(default)]
    pub art: Option<String>,
    #[serde(default)]
    pub trackid: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub mime: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelperListing {
    pub entries: Vec<HelperEntry>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
struct TrackUri {
    uri: String,
}

/// Client for the helper's JSON API
#[derive(Debug, Clone)]
pub struct HelperClient {
    http: Client,
    base_url: Url,
}

impl HelperClient {
    pub fn new(mut base_url: Url) -> Result<Self> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(TidalError::InvalidUrl(base_url.to_string()));
        }
        // Endpoints are joined relative to the base path
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("SoulDirectory/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| TidalError::InvalidUrl(e.to_string()))
    }

    pub(crate) async fn browse(&self, query: &BrowseQuery<'_>) -> Result<HelperListing> {
        let url = self.endpoint("browse")?;
        debug!(url = %url, objid = query.objid, "Helper browse");
        let response = self.http.post(url).json(query).send().await?;
        parse_json(response).await
    }

    pub(crate) async fn search(&self, query: &SearchQuery<'_>) -> Result<HelperListing> {
        let url = self.endpoint("search")?;
        debug!(url = %url, objid = query.objid, "Helper search");
        let response = self.http.post(url).json(query).send().await?;
        parse_json(response).await
    }

    /// Actual streaming URL for a track
    pub async fn track_uri(&self, track_id: &str) -> Result<String> {
        let mut url = self.endpoint("trackuri")?;
        url.query_pairs_mut().append_pair("id", track_id);
        debug!(url = %url, "Helper track uri");
        let response = self.http.get(url).send().await?;
        let track: TrackUri = parse_json(response).await?;
        Ok(track.uri)
    }
}

async fn parse_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| TidalError::ParseError(e.to_string()))
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(TidalError::Helper {
            status: status.as_u16(),
            message,
        })
    }
}
