use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Identifier of a favorited record.
pub type FavoriteId = i64;

#[derive(Debug, Error)]
pub enum FavoriteItemError {
    #[error("Failed to convert record: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Record has no integer 'id' field")]
    MissingId,
}

/// Opaque favorited record.
///
/// Only `id` is interpreted. The remaining fields are kept verbatim so the
/// record can be shown again without a re-fetch. Serializes as a flat object:
/// `{"id": 1, "name": "Rick Sanchez", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub id: FavoriteId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FavoriteItem {
    pub fn new(id: FavoriteId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Adds a field, replacing any previous value. `id` cannot be overridden.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if name != "id" {
            self.fields.insert(name, value.into());
        }
        self
    }

    /// Builds an item from any serializable record carrying an integer `id`.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, FavoriteItemError> {
        let Value::Object(mut fields) = serde_json::to_value(record)? else {
            return Err(FavoriteItemError::NotAnObject);
        };
        let id = fields
            .remove("id")
            .and_then(|v| v.as_i64())
            .ok_or(FavoriteItemError::MissingId)?;
        Ok(Self { id, fields })
    }

    /// Decodes the stored record back into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FavoriteItemError> {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::from(self.id));
        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Convenience accessor for the `name` field, when present.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }
}
