//! Shelf Types - Pure type definitions shared by the server and the load
//! generator.
//!
//! This crate contains only plain data types with no async runtime
//! dependencies.

use serde::{Deserialize, Serialize};

/// A stored item.
///
/// The id is assigned by the storage backend at creation time and never
/// changes or gets reused afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    /// Optional free-form text; empty string when not provided.
    #[serde(default)]
    pub description: String,
}

/// Response body of the reporting create route (`POST /testitems`).
///
/// Unlike the form route, this one has to tell the caller which id was
/// assigned, so load clients can verify their writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReport {
    pub status: String,
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_json_shape() {
        let item = Item {
            id: 7,
            name: "wrench".to_string(),
            description: String::new(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "name": "wrench", "description": ""})
        );
    }

    #[test]
    fn item_description_defaults_to_empty() {
        let item: Item = serde_json::from_str(r#"{"id": 1, "name": "a"}"#).unwrap();
        assert_eq!(item.description, "");
    }
}
