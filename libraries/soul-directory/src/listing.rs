/// Pagination windows, listing results and request modifiers
use crate::entry::ListingEntry;
use serde::{Deserialize, Serialize};

/// Page bounds requested by a control point
///
/// `requested_count <= 0` means "everything from `starting_index`" to
/// backends, and "count only" to the root provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationWindow {
    pub starting_index: i64,
    pub requested_count: i64,
}

impl PaginationWindow {
    pub fn new(starting_index: i64, requested_count: i64) -> Self {
        Self {
            starting_index,
            requested_count,
        }
    }

    /// Window covering every entry
    pub fn all() -> Self {
        Self::new(0, 0)
    }

    /// Negative start or non-positive count
    pub fn is_count_only(&self) -> bool {
        self.starting_index < 0 || self.requested_count <= 0
    }

    /// Apply the window to an in-memory sequence
    ///
    /// A non-positive count returns everything from the start index; a
    /// negative start is clamped to zero.
    pub fn apply<T: Clone>(&self, all: &[T]) -> Vec<T> {
        let start = usize::try_from(self.starting_index.max(0)).unwrap_or(usize::MAX);
        let iter = all.iter().skip(start).cloned();
        if self.requested_count > 0 {
            let count = usize::try_from(self.requested_count).unwrap_or(usize::MAX);
            iter.take(count).collect()
        } else {
            iter.collect()
        }
    }

    /// Cut a page produced elsewhere down to `requested_count`
    ///
    /// Pages are never re-sorted or re-offset, only trimmed at the end.
    pub fn truncate_page<T>(&self, entries: &mut Vec<T>) {
        if self.requested_count > 0 {
            let count = usize::try_from(self.requested_count).unwrap_or(usize::MAX);
            entries.truncate(count);
        }
    }
}

/// Entries for one page plus the size of the full set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResult {
    pub entries: Vec<ListingEntry>,
    /// Full count of children or matches, irrespective of the window
    pub total_matches: usize,
}

impl ListingResult {
    pub fn new(entries: Vec<ListingEntry>, total_matches: usize) -> Self {
        Self {
            entries,
            total_matches,
        }
    }

    /// No entries, zero total
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn number_returned(&self) -> usize {
        self.entries.len()
    }
}

/// What a Browse request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowseMode {
    /// Describe the object itself
    Metadata,
    /// List the object's children
    DirectChildren,
}

impl BrowseMode {
    /// Only the literal `BrowseMetadata` selects metadata mode
    pub fn from_flag(flag: &str) -> Self {
        if flag == "BrowseMetadata" {
            BrowseMode::Metadata
        } else {
            BrowseMode::DirectChildren
        }
    }

    pub fn as_flag(&self) -> &'static str {
        match self {
            BrowseMode::Metadata => "BrowseMetadata",
            BrowseMode::DirectChildren => "BrowseDirectChildren",
        }
    }
}

/// Split a SortCriteria argument into its fields (`+dc:title,-upnp:album`)
pub fn parse_sort_criteria(criteria: &str) -> Vec<String> {
    criteria
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
