//! Error types for the content directory core.
//!
//! Two tiers: [`ActionError`] is what a caller of an action sees (malformed
//! request), [`DirectoryError`] is the internal, structured reason a lookup
//! degraded to an empty listing. The latter never reaches the protocol layer.

use thiserror::Error;

/// Result type alias using [`DirectoryError`]
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Internal failure while routing or serving a listing
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Object id is missing one of its two `$` separators
    #[error("Malformed object id: [{0}]")]
    MalformedId(String),

    /// No backend is registered under this name
    #[error("Unknown backend: [{0}]")]
    UnknownBackend(String),

    /// The root container has no backend to search within
    #[error("Can't search in root")]
    RootNotSearchable,

    /// Could not determine this service's own reachable address
    #[error("Address discovery failed: {0}")]
    AddressDiscovery(String),

    /// A backend reported a failure
    #[error("Backend {backend} failed: {message}")]
    Backend { backend: String, message: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DirectoryError {
    /// Create a backend error
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create an address discovery error
    pub fn address_discovery(msg: impl Into<String>) -> Self {
        Self::AddressDiscovery(msg.into())
    }
}

/// Failure signalled back to the action dispatcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// A required argument is missing or has the wrong shape
    #[error("Invalid argument: {name}")]
    InvalidArgument { name: String },

    /// The service has no action with this name
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl ActionError {
    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into() }
    }

    /// UPnP error code the transport reports for this failure
    pub fn upnp_code(&self) -> u16 {
        match self {
            ActionError::InvalidArgument { .. } => 402,
            ActionError::UnknownAction(_) => 401,
        }
    }

    /// UPnP error description matching [`Self::upnp_code`]
    pub fn upnp_description(&self) -> &'static str {
        match self {
            ActionError::InvalidArgument { .. } => "Invalid Args",
            ActionError::UnknownAction(_) => "Invalid Action",
        }
    }
}
