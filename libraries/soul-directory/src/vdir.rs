/// Virtual directory: URL spaces served on behalf of backends
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// What a virtual path resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualResource {
    /// Send the client elsewhere (302)
    Redirect(String),
    /// Serve bytes directly
    Content { mime: String, body: Vec<u8> },
}

/// Handler for one mounted prefix
#[async_trait]
pub trait FileOps: Send + Sync {
    /// `path` is relative to the mount prefix and starts with `/`
    async fn open(&self, path: &str, query: Option<&str>) -> Result<VirtualResource>;
}

/// Prefix-keyed table of [`FileOps`] handlers shared with the HTTP layer
#[derive(Default)]
pub struct VirtualDir {
    dirs: RwLock<BTreeMap<String, Arc<dyn FileOps>>>,
}

impl VirtualDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `ops` at `prefix`, replacing any previous handler
    pub async fn add_vdir(&self, prefix: &str, ops: Arc<dyn FileOps>) {
        let prefix = normalize(prefix);
        debug!("VirtualDir: mounting {}", prefix);
        self.dirs.write().await.insert(prefix, ops);
    }

    /// Returns true if something was mounted there
    pub async fn remove_vdir(&self, prefix: &str) -> bool {
        self.dirs.write().await.remove(&normalize(prefix)).is_some()
    }

    /// Longest mounted prefix covering `path`, and the remainder of the path
    pub async fn resolve(&self, path: &str) -> Option<(Arc<dyn FileOps>, String)> {
        let dirs = self.dirs.read().await;
        dirs.iter()
            .filter(|(prefix, _)| {
                path == prefix.as_str()
                    || (path.starts_with(prefix.as_str())
                        && path[prefix.len()..].starts_with('/'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, ops)| {
                let rest = &path[prefix.len()..];
                let rest = if rest.is_empty() { "/" } else { rest };
                (Arc::clone(ops), rest.to_string())
            })
    }

    pub async fn prefixes(&self) -> Vec<String> {
        self.dirs.read().await.keys().cloned().collect()
    }
}

fn normalize(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    format!("/{trimmed}")
}
