//! Request dispatcher.
//!
//! Turns every input record of a batch into exactly one HTTP call and
//! flattens the responses into one ordered output stream. Records run
//! strictly one after another; a failing record either becomes an error
//! record or aborts the batch, as the failure policy decides.

use crate::credentials::{CredentialSource, Credentials};
use crate::enums::{Operation, OperationParseError, Resource, ResourceParseError, Selectors};
use crate::error::{DispatchError, DispatchResult, RecordError, TransportError};
use crate::normalize::{normalize, OutputRecord};
use crate::params::{resolve, BatchParameters};
use crate::request::{build_request, RequestDescriptor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// COLLABORATORS
// ============================================================================

/// Sends a request descriptor and returns the decoded JSON body.
///
/// Transport concerns (base URL, TLS, timeouts, status classification) belong
/// to the implementation.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        (**self).send(request).await
    }
}

/// Host switch deciding what happens to a failed record.
pub trait FailurePolicy: Send + Sync {
    fn continue_on_failure(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Stop the batch at the first failure.
    #[default]
    Abort,
    /// Emit an error record and move on.
    Continue,
}

impl FailureMode {
    pub fn from_flag(continue_on_failure: bool) -> Self {
        if continue_on_failure {
            FailureMode::Continue
        } else {
            FailureMode::Abort
        }
    }
}

impl FailurePolicy for FailureMode {
    fn continue_on_failure(&self) -> bool {
        matches!(self, FailureMode::Continue)
    }
}

// ============================================================================
// BATCH
// ============================================================================

/// Position of one input record in the batch.
///
/// The record body never feeds the request, so only the index is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRecord {
    pub index: usize,
}

/// Everything a single invocation works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub selectors: Selectors,
    #[serde(default)]
    pub parameters: BatchParameters,
    #[serde(default)]
    pub records: Vec<Value>,
}

impl Batch {
    pub fn new(selectors: Selectors, parameters: BatchParameters, records: Vec<Value>) -> Self {
        Self {
            selectors,
            parameters,
            records,
        }
    }

    pub fn inputs(&self) -> impl Iterator<Item = InputRecord> {
        (0..self.records.len()).map(|index| InputRecord { index })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Build the request for the record at `index`.
///
/// An operation outside the five known values is an internal consistency
/// fault; the method mapping never falls back to a default verb. For
/// `getAll`, a non-integer `limit` or `offset` is an invalid parameter.
pub fn prepare_request(
    selectors: &Selectors,
    parameters: &BatchParameters,
    index: usize,
    credentials: &Credentials,
) -> Result<RequestDescriptor, RecordError> {
    let resolved = resolve(index, parameters, credentials);
    let resource: Resource = selectors.resource.parse().map_err(|e: ResourceParseError| {
        RecordError::InvalidParameter {
            name: "resource",
            value: e.0,
        }
    })?;
    let operation: Operation = selectors
        .operation
        .parse()
        .map_err(|e: OperationParseError| RecordError::InternalConsistency { operation: e.0 })?;
    if operation == Operation::GetAll {
        resolved.additional_fields.validate()?;
    }
    Ok(build_request(resource, operation, &resolved, credentials))
}

/// Build every request of a batch without sending anything.
pub fn plan(batch: &Batch, credentials: &Credentials) -> Vec<Result<RequestDescriptor, RecordError>> {
    batch
        .inputs()
        .map(|record| {
            prepare_request(&batch.selectors, &batch.parameters, record.index, credentials)
        })
        .collect()
}

/// Sequential dispatcher over an injected HTTP client.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    client: C,
}

impl<C: HttpClient> Dispatcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one batch.
    ///
    /// Credentials are fetched once up front. On abort the error carries the
    /// failing record's index; requests already sent for earlier records are
    /// not undone.
    pub async fn execute(
        &self,
        batch: &Batch,
        credentials: &dyn CredentialSource,
        policy: &dyn FailurePolicy,
    ) -> DispatchResult<Vec<OutputRecord>> {
        let credentials = credentials.credentials().await?;
        tracing::info!(
            subtitle = %batch.selectors.subtitle(),
            records = batch.len(),
            "Dispatching batch"
        );

        let mut output = Vec::with_capacity(batch.len());
        for record in batch.inputs() {
            match self.dispatch_record(batch, record.index, &credentials).await {
                Ok(records) => output.extend(records),
                Err(err) if policy.continue_on_failure() => {
                    tracing::warn!(index = record.index, error = %err, "Record failed, continuing");
                    output.push(OutputRecord::error(err.to_string()));
                }
                Err(err) => {
                    tracing::error!(index = record.index, error = %err, "Record failed, aborting batch");
                    return Err(DispatchError::Record {
                        index: record.index,
                        source: err,
                    });
                }
            }
        }

        tracing::info!(outputs = output.len(), "Batch complete");
        Ok(output)
    }

    async fn dispatch_record(
        &self,
        batch: &Batch,
        index: usize,
        credentials: &Credentials,
    ) -> Result<Vec<OutputRecord>, RecordError> {
        let request = prepare_request(&batch.selectors, &batch.parameters, index, credentials)?;
        tracing::debug!(
            index,
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let response = self.client.send(&request).await?;
        let records = normalize(response);
        tracing::debug!(index, items = records.len(), "Normalized response");
        Ok(records)
    }
}

// =============================================================================
// TESTS
// =============================================================================
