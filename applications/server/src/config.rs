/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use soul_directory::connection_manager::DEFAULT_PROTOCOL_INFO;
use soul_directory::content_directory::DEFAULT_SEARCH_CAPABILITIES;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_directory")]
    pub directory: DirectorySettings,

    #[serde(default)]
    pub backends: BackendsSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Host put in callback URLs; discovered from the routing table if unset
    #[serde(default)]
    pub advertised_host: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectorySettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_search_capabilities")]
    pub search_capabilities: String,

    #[serde(default)]
    pub sort_capabilities: String,

    #[serde(default = "default_protocol_info")]
    pub protocol_info: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendsSettings {
    #[serde(default = "default_tidal")]
    pub tidal: TidalSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TidalSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_tidal_helper_url")]
    pub helper_url: String,

    #[serde(default = "default_tidal_title")]
    pub title: String,
}

impl TidalSettings {
    pub fn helper_url(&self) -> Result<Url> {
        Url::parse(&self.helper_url).map_err(|e| {
            ServerError::Config(format!("Invalid tidal helper URL {:?}: {}", self.helper_url, e))
        })
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Environment variables use the `SOUL_DIRECTORY_` prefix and `__` between
    /// nesting levels, e.g. `SOUL_DIRECTORY_SERVER__PORT=8200`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                // Load from config file if it exists
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SOUL_DIRECTORY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config(
                "Port 0 can't be advertised to control points".to_string(),
            ));
        }

        if self.backends.tidal.enabled {
            let url = self.backends.tidal.helper_url()?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ServerError::Config(format!(
                    "Tidal helper URL must be http(s): {}",
                    url
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        advertised_host: None,
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    49152
}

fn default_directory() -> DirectorySettings {
    DirectorySettings {
        data_dir: default_data_dir(),
        search_capabilities: default_search_capabilities(),
        sort_capabilities: String::new(),
        protocol_info: default_protocol_info(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_search_capabilities() -> String {
    DEFAULT_SEARCH_CAPABILITIES.to_string()
}

fn default_protocol_info() -> String {
    DEFAULT_PROTOCOL_INFO.to_string()
}

fn default_tidal() -> TidalSettings {
    TidalSettings {
        enabled: default_enabled(),
        helper_url: default_tidal_helper_url(),
        title: default_tidal_title(),
    }
}

fn default_enabled() -> bool {
    true
}

fn default_tidal_helper_url() -> String {
    "http://127.0.0.1:49149/".to_string()
}

fn default_tidal_title() -> String {
    soul_tidal::DEFAULT_TITLE.to_string()
}

impl Default for TidalSettings {
    fn default() -> Self {
        default_tidal()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            directory: default_directory(),
            backends: BackendsSettings::default(),
        }
    }
}
