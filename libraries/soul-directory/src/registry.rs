//! Backend registry
//!
//! Lazily constructs one backend per name and owns it until shutdown.
//! Construction is serialized per name through a `OnceCell`, so concurrent
//! first lookups of the same name build exactly one instance while lookups
//! of other names proceed independently.

use crate::address::AddressProvider;
use crate::backend::{Backend, BackendContext};
use crate::error::{DirectoryError, Result};
use crate::vdir::VirtualDir;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, info, warn};

/// Constructor for one statically known backend
#[async_trait]
pub trait BackendFactory: Send + Sync {
    /// Title of the backend's container under the root
    fn title(&self) -> &str;

    async fn create(&self, ctx: BackendContext) -> Result<Arc<dyn Backend>>;
}

/// Name and root-listing title of a known backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub name: String,
    pub title: String,
}

type BackendCell = Arc<OnceCell<Arc<dyn Backend>>>;

pub struct BackendRegistry {
    /// Closed name -> constructor table, in root-listing order
    factories: Vec<(String, Arc<dyn BackendFactory>)>,
    address: Arc<dyn AddressProvider>,
    vdir: Arc<VirtualDir>,
    data_dir: PathBuf,
    host_port: OnceCell<String>,
    backends: Mutex<HashMap<String, BackendCell>>,
}

impl BackendRegistry {
    pub fn new(address: Arc<dyn AddressProvider>, vdir: Arc<VirtualDir>, data_dir: PathBuf) -> Self {
        Self {
            factories: Vec::new(),
            address,
            vdir,
            data_dir,
            host_port: OnceCell::new(),
            backends: Mutex::new(HashMap::new()),
        }
    }

    /// Register the constructor for `name`; a later registration replaces it
    pub fn with_factory(mut self, name: impl Into<String>, factory: Arc<dyn BackendFactory>) -> Self {
        let name = name.into();
        self.factories.retain(|(existing, _)| *existing != name);
        self.factories.push((name, factory));
        self
    }

    /// Known backends, in registration order
    pub fn descriptors(&self) -> Vec<BackendDescriptor> {
        self.factories
            .iter()
            .map(|(name, factory)| BackendDescriptor {
                name: name.clone(),
                title: factory.title().to_string(),
            })
            .collect()
    }

    pub fn vdir(&self) -> &Arc<VirtualDir> {
        &self.vdir
    }

    /// Cached or freshly built backend for `name`, `None` if it can't be had
    ///
    /// Failures are logged here and not reported further.
    pub async fn resolve(&self, name: &str) -> Option<Arc<dyn Backend>> {
        match self.try_resolve(name).await {
            Ok(backend) => Some(backend),
            Err(e @ DirectoryError::UnknownBackend(_)) => {
                warn!("BackendRegistry: {}", e);
                None
            }
            Err(e) => {
                error!(backend = name, "BackendRegistry: construction failed: {}", e);
                None
            }
        }
    }

    /// Like [`Self::resolve`] but with the reason for a miss
    pub async fn try_resolve(&self, name: &str) -> Result<Arc<dyn Backend>> {
        let factory = self
            .factories
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, factory)| Arc::clone(factory))
            .ok_or_else(|| DirectoryError::UnknownBackend(name.to_string()))?;

        let cell = {
            let mut backends = self.backends.lock().await;
            Arc::clone(backends.entry(name.to_string()).or_default())
        };

        let backend = cell
            .get_or_try_init(|| self.construct(name, factory))
            .await?;
        Ok(Arc::clone(backend))
    }

    async fn construct(&self, name: &str, factory: Arc<dyn BackendFactory>) -> Result<Arc<dyn Backend>> {
        debug!("BackendRegistry: constructing {}", name);

        let host_port = self
            .host_port
            .get_or_try_init(|| self.address.host_port())
            .await?
            .clone();

        let url_prefix = format!("/{name}");
        let ctx = BackendContext {
            name: name.to_string(),
            host_port,
            url_prefix: url_prefix.clone(),
            data_dir: self.data_dir.join(name),
        };

        let backend = factory.create(ctx).await?;
        if let Some(ops) = backend.file_ops() {
            self.vdir.add_vdir(&url_prefix, ops).await;
        }

        info!(backend = name, "Backend constructed");
        Ok(backend)
    }

    /// Names of the backends constructed so far
    pub async fn live_backends(&self) -> Vec<String> {
        let backends = self.backends.lock().await;
        let mut names: Vec<String> = backends
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Shut down and release every constructed backend
    pub async fn shutdown(&self) {
        let cells: Vec<(String, BackendCell)> = self.backends.lock().await.drain().collect();
        for (name, cell) in cells {
            if let Some(backend) = cell.get() {
                backend.shutdown().await;
                self.vdir.remove_vdir(&format!("/{name}")).await;
                info!(backend = %name, "Backend shut down");
            }
        }
    }
}
