/// Shared application state
use crate::config::ServerConfig;
use crate::error::Result;
use soul_directory::{
    BackendRegistry, ConnectionManager, ContentDirectory, LocalAddressProvider, ServiceActions,
    VirtualDir,
};
use soul_tidal::{TidalFactory, BACKEND_NAME};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Services by short name (`ContentDirectory`, `ConnectionManager`)
    pub services: Arc<BTreeMap<String, Arc<dyn ServiceActions>>>,
    pub registry: Arc<BackendRegistry>,
    pub vdir: Arc<VirtualDir>,
}

impl AppState {
    pub fn new(directory: ContentDirectory, connection_manager: ConnectionManager) -> Self {
        let registry = Arc::clone(directory.registry());
        let vdir = Arc::clone(registry.vdir());

        let mut services: BTreeMap<String, Arc<dyn ServiceActions>> = BTreeMap::new();
        services.insert("ContentDirectory".to_string(), Arc::new(directory));
        services.insert("ConnectionManager".to_string(), Arc::new(connection_manager));

        Self {
            services: Arc::new(services),
            registry,
            vdir,
        }
    }

    /// Wire registry, backends and services from configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let address = LocalAddressProvider::new(
            config.server.advertised_host.clone(),
            config.server.port,
        );
        let mut registry = BackendRegistry::new(
            Arc::new(address),
            Arc::new(VirtualDir::new()),
            config.directory.data_dir.clone(),
        );

        let tidal = &config.backends.tidal;
        if tidal.enabled {
            registry = registry.with_factory(
                BACKEND_NAME,
                Arc::new(TidalFactory::new(tidal.helper_url()?, tidal.title.clone())),
            );
        }

        let directory = ContentDirectory::new(Arc::new(registry)).with_capabilities(
            config.directory.search_capabilities.clone(),
            config.directory.sort_capabilities.clone(),
        );
        let connection_manager = ConnectionManager::new(config.directory.protocol_info.clone());

        Ok(Self::new(directory, connection_manager))
    }

    pub fn service(&self, name: &str) -> Option<&Arc<dyn ServiceActions>> {
        self.services.get(name)
    }
}
