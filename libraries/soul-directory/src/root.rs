/// Root container listing
use crate::entry::ListingEntry;
use crate::listing::{ListingResult, PaginationWindow};
use crate::object_id::ObjectId;
use crate::registry::BackendDescriptor;
use std::sync::OnceLock;

/// Serves the children of `"0"`: one container per known backend
///
/// The entry list is built on first use and never changes afterwards.
pub struct RootListing {
    backends: Vec<BackendDescriptor>,
    entries: OnceLock<Vec<ListingEntry>>,
}

impl RootListing {
    pub fn new(backends: Vec<BackendDescriptor>) -> Self {
        Self {
            backends,
            entries: OnceLock::new(),
        }
    }

    pub fn entries(&self) -> &[ListingEntry] {
        self.entries.get_or_init(|| {
            self.backends
                .iter()
                .map(|backend| {
                    ListingEntry::container(
                        ObjectId::for_backend(&backend.name, ""),
                        ObjectId::root(),
                        backend.title.clone(),
                    )
                })
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One page of root children
    ///
    /// A negative start or non-positive count is a count-only query. The total
    /// is always the full root size, never the page size.
    pub fn list(&self, window: PaginationWindow) -> ListingResult {
        let entries = self.entries();
        if window.is_count_only() {
            return ListingResult::new(Vec::new(), entries.len());
        }
        ListingResult::new(window.apply(entries), entries.len())
    }
}
