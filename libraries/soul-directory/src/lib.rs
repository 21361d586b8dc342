//! Soul Directory Core
//!
//! Routing and result assembly for a UPnP-style content directory whose
//! content lives in pluggable backends.
//!
//! # Architecture
//!
//! - **Object ids**: `0$<backend>$<path>`; the root is `"0"` ([`object_id`])
//! - **Entries**: containers and items, serialized as DIDL-Lite ([`entry`])
//! - **Registry**: one lazily built [`Backend`] per name ([`registry`])
//! - **Root**: one container per known backend ([`root`])
//! - **Services**: [`ContentDirectory`] (Browse, Search, ...) and
//!   [`ConnectionManager`], both behind [`ServiceActions`]
//!
//! # Example
//!
//! ```rust
//! use soul_directory::{
//!     ActionArgs, BackendRegistry, ContentDirectory, FixedAddress, ServiceActions, VirtualDir,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let registry = BackendRegistry::new(
//!     Arc::new(FixedAddress("127.0.0.1:49152".into())),
//!     Arc::new(VirtualDir::new()),
//!     PathBuf::from("./data"),
//! );
//! let directory = ContentDirectory::new(Arc::new(registry));
//!
//! let args = ActionArgs::new()
//!     .with("ObjectID", "0")
//!     .with("BrowseFlag", "BrowseDirectChildren")
//!     .with("Filter", "*")
//!     .with("StartingIndex", "0")
//!     .with("RequestedCount", "10")
//!     .with("SortCriteria", "");
//! let out = directory.invoke("Browse", &args).await.unwrap();
//! assert_eq!(out.get("NumberReturned"), Some("0"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod actions;
pub mod address;
pub mod backend;
pub mod connection_manager;
pub mod content_directory;
pub mod entry;
pub mod error;
pub mod listing;
pub mod object_id;
pub mod registry;
pub mod root;
pub mod vdir;

pub use actions::{ActionArgs, ActionOutput, ServiceActions};
pub use address::{AddressProvider, FixedAddress, LocalAddressProvider};
pub use backend::{Backend, BackendContext};
pub use connection_manager::ConnectionManager;
pub use content_directory::{BrowseRequest, ContentDirectory, DirectoryResponse, SearchRequest};
pub use entry::{EntryKind, ListingEntry, Resource};
pub use error::{ActionError, DirectoryError, Result};
pub use listing::{BrowseMode, ListingResult, PaginationWindow};
pub use object_id::ObjectId;
pub use registry::{BackendDescriptor, BackendFactory, BackendRegistry};
pub use root::RootListing;
pub use vdir::{FileOps, VirtualDir, VirtualResource};
