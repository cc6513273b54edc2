//! Per-record parameter resolution.
//!
//! Each record may override the connection ID, item ID and additional fields
//! independently. Resolution is a pure lookup: per-index override, then batch
//! default, then the built-in default.

use crate::constants::{DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::credentials::Credentials;
use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Optional pagination controls and any extra query keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdditionalFields(BTreeMap<String, Value>);

impl AdditionalFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Page size, or the default when absent.
    ///
    /// A supplied value that is not a non-negative integer is an error.
    pub fn limit(&self) -> Result<u64, RecordError> {
        self.pagination_value("limit", DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> Result<u64, RecordError> {
        self.pagination_value("offset", DEFAULT_OFFSET)
    }

    /// Check `limit` and `offset` before they go into a query.
    pub fn validate(&self) -> Result<(), RecordError> {
        self.limit()?;
        self.offset()?;
        Ok(())
    }

    fn pagination_value(&self, name: &'static str, default: u64) -> Result<u64, RecordError> {
        match self.0.get(name) {
            None => Ok(default),
            Some(value) => value.as_u64().ok_or_else(|| RecordError::InvalidParameter {
                name,
                value: value.to_string(),
            }),
        }
    }

    /// Query map with `limit`/`offset` defaults filled in.
    ///
    /// Supplied values, including unknown keys, pass through untouched.
    pub fn to_query(&self) -> BTreeMap<String, Value> {
        let mut query = self.0.clone();
        query
            .entry("limit".to_string())
            .or_insert_with(|| json!(DEFAULT_LIMIT));
        query
            .entry("offset".to_string())
            .or_insert_with(|| json!(DEFAULT_OFFSET));
        query
    }
}

impl From<BTreeMap<String, Value>> for AdditionalFields {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Record-level values, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordOverrides {
    pub connection_id: Option<String>,
    pub item_id: Option<String>,
    pub additional_fields: Option<AdditionalFields>,
}

/// Batch defaults plus per-index overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchParameters {
    pub defaults: RecordOverrides,
    pub overrides: BTreeMap<usize, RecordOverrides>,
}

impl BatchParameters {
    pub fn new(defaults: RecordOverrides) -> Self {
        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, index: usize, overrides: RecordOverrides) -> Self {
        self.overrides.insert(index, overrides);
        self
    }
}

/// Fully resolved values for one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParams {
    pub connection_id: String,
    pub item_id: String,
    pub additional_fields: AdditionalFields,
}

/// Resolve the parameters for the record at `index`.
///
/// An empty connection ID falls back to the credentials' default.
pub fn resolve(index: usize, params: &BatchParameters, credentials: &Credentials) -> ResolvedParams {
    let record = params.overrides.get(&index);

    let connection_id = record
        .and_then(|r| r.connection_id.clone())
        .or_else(|| params.defaults.connection_id.clone())
        .unwrap_or_default();
    let connection_id = if connection_id.is_empty() {
        credentials.connection_id().unwrap_or_default().to_string()
    } else {
        connection_id
    };

    let item_id = record
        .and_then(|r| r.item_id.clone())
        .or_else(|| params.defaults.item_id.clone())
        .unwrap_or_default();

    let additional_fields = record
        .and_then(|r| r.additional_fields.clone())
        .or_else(|| params.defaults.additional_fields.clone())
        .unwrap_or_default();

    ResolvedParams {
        connection_id,
        item_id,
        additional_fields,
    }
}
