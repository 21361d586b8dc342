//! Soul Directory Server Library
//!
//! Media directory service: exposes the ContentDirectory and
//! ConnectionManager actions over HTTP and serves backend URL spaces.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;
