//! Request descriptor construction.

use crate::constants::{ACCESS_PATH_PREFIX, API_KEY_HEADER, CONNECTION_ID_HEADER};
use crate::credentials::Credentials;
use crate::enums::{HttpMethod, Operation, Resource};
use crate::params::ResolvedParams;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Fully determined outbound request, relative to the API base URL.
#[derive(Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<BTreeMap<String, Value>>,
}

impl RequestDescriptor {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Query parameters flattened to strings.
    ///
    /// String values are used as-is, other values by their JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .flatten()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Copy with the API key header masked, for printing.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(value) = copy.headers.get_mut(API_KEY_HEADER) {
            *value = "***".to_string();
        }
        copy
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("RequestDescriptor")
            .field("method", &redacted.method)
            .field("url", &redacted.url)
            .field("headers", &redacted.headers)
            .field("query", &redacted.query)
            .finish()
    }
}

/// Path for a resource, with the item suffix when the operation targets one.
pub fn request_path(resource: Resource, operation: Operation, item_id: &str) -> String {
    let mut path = format!("{}/{}", ACCESS_PATH_PREFIX, resource.as_str());
    if !item_id.is_empty() && operation.targets_item() {
        path.push('/');
        path.push_str(item_id);
    }
    path
}

/// Build the descriptor for one record. Pure; reads nothing but its inputs.
pub fn build_request(
    resource: Resource,
    operation: Operation,
    params: &ResolvedParams,
    credentials: &Credentials,
) -> RequestDescriptor {
    let mut headers = BTreeMap::new();
    headers.insert(API_KEY_HEADER.to_string(), credentials.api_key().to_string());
    if !params.connection_id.is_empty() {
        headers.insert(
            CONNECTION_ID_HEADER.to_string(),
            params.connection_id.clone(),
        );
    }

    let query = match operation {
        Operation::GetAll => Some(params.additional_fields.to_query()),
        _ => None,
    };

    RequestDescriptor {
        method: operation.method(),
        url: request_path(resource, operation, &params.item_id),
        headers,
        query,
    }
}
