//! Named-argument plumbing between the action dispatcher and the services.
//!
//! The transport hands each action a bag of string arguments and serializes
//! the ordered list of named outputs that comes back.

use crate::error::ActionError;
use async_trait::async_trait;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Arguments of one action invocation
///
/// Deserializes from a flat JSON object. Numbers and booleans are accepted
/// and kept in their UPnP string form (`5`, `1`/`0`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionArgs(HashMap<String, String>);

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ArgValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ArgValue {
    fn into_arg(self) -> String {
        match self {
            ArgValue::Text(text) => text,
            ArgValue::Int(n) => n.to_string(),
            ArgValue::Float(f) => f.to_string(),
            ArgValue::Bool(b) => String::from(if b { "1" } else { "0" }),
        }
    }
}

impl<'de> Deserialize<'de> for ActionArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, ArgValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(name, value)| (name, value.into_arg()))
            .collect())
    }
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Integer argument; an unparsable value counts as absent
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get_str(name)?.trim().parse().ok()
    }

    pub fn require_str(&self, name: &str) -> Result<&str, ActionError> {
        self.get_str(name)
            .ok_or_else(|| ActionError::invalid_argument(name))
    }

    pub fn require_int(&self, name: &str) -> Result<i64, ActionError> {
        self.get_int(name)
            .ok_or_else(|| ActionError::invalid_argument(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ActionArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Ordered named outputs of one action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutput(Vec<(String, String)>);

impl ActionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_arg(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_arg(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ActionOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A service reachable through the action dispatcher
#[async_trait]
pub trait ServiceActions: Send + Sync {
    /// `urn:schemas-upnp-org:service:...`
    fn service_type(&self) -> &str;

    /// `urn:upnp-org:serviceId:...`
    fn service_id(&self) -> &str;

    /// Action names this service answers
    fn actions(&self) -> &'static [&'static str];

    async fn invoke(&self, action: &str, args: &ActionArgs) -> Result<ActionOutput, ActionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arguments() {
        let args = ActionArgs::new()
            .with("StartingIndex", " 5 ")
            .with("RequestedCount", "ten");
        assert_eq!(args.get_int("StartingIndex"), Some(5));
        assert_eq!(args.get_int("RequestedCount"), None);
        assert_eq!(
            args.require_int("RequestedCount"),
            Err(ActionError::invalid_argument("RequestedCount"))
        );
        assert_eq!(
            args.require_int("Missing"),
            Err(ActionError::invalid_argument("Missing"))
        );
    }

    #[test]
    fn test_empty_string_is_present() {
        let args: ActionArgs = [("Filter", "")].into_iter().collect();
        assert_eq!(args.require_str("Filter"), Ok(""));
    }

    #[test]
    fn test_deserialize_accepts_scalars() {
        let args: ActionArgs = serde_json::from_value(serde_json::json!({
            "ObjectID": "0",
            "StartingIndex": 0,
            "RequestedCount": 25,
            "Recursive": true,
        }))
        .unwrap();
        assert_eq!(args.get_str("ObjectID"), Some("0"));
        assert_eq!(args.require_int("StartingIndex"), Ok(0));
        assert_eq!(args.require_int("RequestedCount"), Ok(25));
        assert_eq!(args.get_str("Recursive"), Some("1"));
    }

    #[test]
    fn test_deserialize_rejects_nested_values() {
        let result: Result<ActionArgs, _> =
            serde_json::from_value(serde_json::json!({ "ObjectID": ["0"] }));
        assert!(result.is_err());
        let result: Result<ActionArgs, _> = serde_json::from_value(serde_json::json!([1, 2]));
        assert!(result.is_err());
    }

    #[test]
    fn test_output_keeps_order() {
        let out = ActionOutput::new()
            .with("Result", "<DIDL-Lite/>")
            .with("NumberReturned", "0")
            .with("TotalMatches", "0");
        let names: Vec<&str> = out.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Result", "NumberReturned", "TotalMatches"]);
        assert_eq!(out.get("NumberReturned"), Some("0"));
        assert_eq!(out.get("UpdateID"), None);
    }
}
