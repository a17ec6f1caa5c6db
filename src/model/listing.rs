use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{deserialize_flexible_id, Id};

/// Shape of an upstream list endpoint: either a bare array or `{"items": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { items: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Bare(items) => items,
            Listing::Wrapped { items } => items,
        }
    }
}

impl<T: DeserializeOwned> Listing<T> {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Minimal view of any upstream record: just its key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identified {
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub id: Option<Id>,
}

/// True when a listing contains a record with the given id.
pub fn contains_id(items: &[Identified], target: Id) -> bool {
    items.iter().any(|item| item.id == Some(target))
}
