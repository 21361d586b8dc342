/// Object identifiers and the backend-selector codec
///
/// Every id except the root has the shape `<prefix>$<backend>$<local-path>`.
/// All knowledge of the `$` convention lives in this module.
use crate::error::{DirectoryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal id of the root container
pub const ROOT_ID: &str = "0";

/// Separator between prefix, backend name and backend-local path
pub const SEPARATOR: char = '$';

/// Directory object identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap an id received from a control point
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The root container id
    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    /// Build a backend-owned id: `0$<backend>$<path>`
    ///
    /// Backends use this for every id they hand out so that later requests
    /// route back to them.
    pub fn for_backend(backend: &str, path: &str) -> Self {
        Self(format!("{ROOT_ID}{SEPARATOR}{backend}{SEPARATOR}{path}"))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the root container id
    pub fn is_root(&self) -> bool {
        is_root(&self.0)
    }

    /// Name of the backend owning this id
    pub fn backend_name(&self) -> Result<&str> {
        backend_name_of(&self.0)
    }

    /// Backend-local part, everything after the second separator
    pub fn local_path(&self) -> Result<&str> {
        let (_, p1) = separators(&self.0)?;
        Ok(&self.0[p1 + 1..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// True iff `id` is the literal root id
pub fn is_root(id: &str) -> bool {
    id == ROOT_ID
}

/// Extract the backend name between the first and second `$`
///
/// An empty name (`"0$$x"`) is accepted here; refusing it is up to the caller.
pub fn backend_name_of(id: &str) -> Result<&str> {
    let (p0, p1) = separators(id)?;
    Ok(&id[p0 + 1..p1])
}

fn separators(id: &str) -> Result<(usize, usize)> {
    let p0 = id
        .find(SEPARATOR)
        .ok_or_else(|| DirectoryError::MalformedId(id.to_string()))?;
    let p1 = id[p0 + 1..]
        .find(SEPARATOR)
        .map(|offset| p0 + 1 + offset)
        .ok_or_else(|| DirectoryError::MalformedId(id.to_string()))?;
    Ok((p0, p1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name_of_synthetic_root_child() {
        assert_eq!(backend_name_of("0$tidal$").unwrap(), "tidal");
    }

    #[test]
    fn test_backend_name_of_deep_path() {
        assert_eq!(
            backend_name_of("0$tidal$/albums/1234$5").unwrap(),
            "tidal"
        );
    }

    #[test]
    fn test_missing_separators_are_malformed() {
        assert!(matches!(
            backend_name_of("garbage"),
            Err(DirectoryError::MalformedId(_))
        ));
        assert!(matches!(
            backend_name_of("0$tidal"),
            Err(DirectoryError::MalformedId(_))
        ));
        assert!(matches!(
            backend_name_of("0"),
            Err(DirectoryError::MalformedId(_))
        ));
    }

    #[test]
    fn test_empty_backend_name_is_accepted() {
        assert_eq!(backend_name_of("0$$x").unwrap(), "");
    }

    #[test]
    fn test_is_root() {
        assert!(is_root("0"));
        assert!(ObjectId::root().is_root());
        assert!(!is_root("0$tidal$"));
        assert!(!is_root(""));
        assert!(!is_root("00"));
    }

    #[test]
    fn test_for_backend_round_trips() {
        let id = ObjectId::for_backend("tidal", "/playlists/42");
        assert_eq!(id.as_str(), "0$tidal$/playlists/42");
        assert_eq!(id.backend_name().unwrap(), "tidal");
        assert_eq!(id.local_path().unwrap(), "/playlists/42");
    }

    #[test]
    fn test_display() {
        assert_eq!(ObjectId::new("0$tidal$").to_string(), "0$tidal$");
    }
}
