//! Soul Directory - Tidal backend
//!
//! Exposes the Tidal catalog through the content directory. Catalog access
//! itself runs in a helper process with its own session; this crate forwards
//! browse/search windows to it over HTTP and rewrites what comes back into
//! directory entries whose ids and media URLs route through this service.

mod backend;
mod error;
mod factory;
mod helper;

pub use backend::{TidalBackend, TidalFileOps};
pub use error::{Result, TidalError};
pub use factory::TidalFactory;
pub use helper::{HelperClient, HelperEntry, HelperListing};

/// Name used in object ids and as the URL prefix
pub const BACKEND_NAME: &str = "tidal";

/// Root container title
pub const DEFAULT_TITLE: &str = "Tidal";
