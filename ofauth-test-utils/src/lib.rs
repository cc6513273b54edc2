//! OFAuth Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Mock HTTP client for dispatcher tests
//! - Proptest generators for selectors, parameters and responses
//! - Fixtures for common batches

pub use ofauth_core::{
    AdditionalFields, Batch, BatchParameters, Credentials, HttpClient, Operation, OutputRecord,
    RecordOverrides, RequestDescriptor, Resource, Selectors, StaticCredentials, TransportError,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// MOCK HTTP CLIENT
// ============================================================================

/// Scripted HTTP client that records every request it receives.
///
/// Replies come from the queue in call order. Calls listed in the failure
/// table fail instead, without consuming a reply. Once the queue is empty the
/// fallback reply is returned.
#[derive(Debug)]
pub struct MockHttpClient {
    replies: Mutex<VecDeque<Value>>,
    failures: HashMap<usize, TransportError>,
    fallback: Value,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            failures: HashMap::new(),
            fallback: json!({}),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply with the same value to every call.
    pub fn always(reply: Value) -> Self {
        Self::new().with_fallback(reply)
    }

    pub fn with_reply(self, reply: Value) -> Self {
        self.push_reply(reply);
        self
    }

    pub fn with_replies(self, replies: impl IntoIterator<Item = Value>) -> Self {
        for reply in replies {
            self.push_reply(reply);
        }
        self
    }

    pub fn with_fallback(mut self, reply: Value) -> Self {
        self.fallback = reply;
        self
    }

    /// Fail the call with zero-based number `call`.
    pub fn failing_on(mut self, call: usize, error: TransportError) -> Self {
        self.failures.insert(call, error);
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn push_reply(&self, reply: Value) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        let call = {
            let mut requests = self.requests.lock().map_err(|_| TransportError::Network {
                message: "mock client lock poisoned".to_string(),
            })?;
            requests.push(request.clone());
            requests.len() - 1
        };

        if let Some(error) = self.failures.get(&call) {
            return Err(error.clone());
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        Ok(reply.unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Transport error with a fixed server status.
pub fn status_error(status: u16, message: &str) -> TransportError {
    TransportError::Status {
        status,
        message: message.to_string(),
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;

    pub const TEST_API_KEY: &str = "test-api-key";

    pub fn credentials() -> Credentials {
        Credentials::new(TEST_API_KEY, None).unwrap_or_else(|e| panic!("fixture credentials: {e}"))
    }

    pub fn credentials_with_connection(connection_id: &str) -> Credentials {
        Credentials::new(TEST_API_KEY, Some(connection_id.to_string()))
            .unwrap_or_else(|e| panic!("fixture credentials: {e}"))
    }

    pub fn source() -> StaticCredentials {
        StaticCredentials::new(credentials())
    }

    /// Batch of `records` small input records.
    pub fn batch(resource: Resource, operation: Operation, records: usize) -> Batch {
        Batch::new(
            Selectors::from_typed(resource, operation),
            BatchParameters::default(),
            (0..records).map(|i| json!({ "n": i })).collect(),
        )
    }

    pub fn batch_with(
        resource: Resource,
        operation: Operation,
        records: usize,
        defaults: RecordOverrides,
    ) -> Batch {
        let mut batch = batch(resource, operation, records);
        batch.parameters = BatchParameters::new(defaults);
        batch
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for dispatcher inputs.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_resource() -> impl Strategy<Value = Resource> {
        proptest::sample::select(Resource::all().to_vec())
    }

    pub fn arb_operation() -> impl Strategy<Value = Operation> {
        proptest::sample::select(Operation::all().to_vec())
    }

    /// Item identifiers, empty included.
    pub fn arb_item_id() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-zA-Z0-9_-]{1,24}"]
    }

    pub fn arb_connection_id() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "conn_[a-z0-9]{4,12}"]
    }

    /// Additional fields with optional limit/offset and extra passthrough keys.
    pub fn arb_additional_fields() -> impl Strategy<Value = AdditionalFields> {
        (
            proptest::option::of(1u64..500),
            proptest::option::of(0u64..10_000),
            proptest::collection::btree_map("x_[a-z]{1,8}", "[a-z0-9]{0,8}", 0..3),
        )
            .prop_map(|(limit, offset, extra)| {
                let mut fields = AdditionalFields::new();
                if let Some(limit) = limit {
                    fields = fields.with("limit", limit);
                }
                if let Some(offset) = offset {
                    fields = fields.with("offset", offset);
                }
                for (key, value) in extra {
                    fields = fields.with(key, value);
                }
                fields
            })
    }

    /// A `limit`/`offset` value that is not a non-negative integer.
    pub fn arb_invalid_pagination() -> impl Strategy<Value = Value> {
        prop_oneof![
            (0u64..1000).prop_map(|n| Value::from(n.to_string())),
            (0u32..1000).prop_map(|n| Value::from(f64::from(n) + 0.5)),
            (0u32..1000).prop_map(|n| Value::from(f64::from(n))),
            (1i64..1000).prop_map(|n| Value::from(-n)),
            Just(Value::Null),
            Just(Value::Bool(true)),
        ]
    }

    /// A JSON item as the API might return it.
    pub fn arb_item() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,12}".prop_map(Value::from),
            ("[a-z0-9]{1,8}", any::<bool>()).prop_map(|(id, flag)| json!({ "id": id, "flag": flag })),
        ]
    }

    pub fn arb_items() -> impl Strategy<Value = Vec<Value>> {
        proptest::collection::vec(arb_item(), 0..8)
    }

    /// Response in one of the three shapes, with the items it should expand to.
    pub fn arb_response() -> impl Strategy<Value = (Value, Vec<Value>)> {
        prop_oneof![
            arb_items().prop_map(|items| (Value::Array(items.clone()), items)),
            arb_items().prop_map(|items| (json!({ "list": items.clone(), "hasMore": false }), items)),
            "[a-z]{1,10}".prop_map(|name| {
                let body = json!({ "name": name });
                (body.clone(), vec![body])
            }),
        ]
    }
}
