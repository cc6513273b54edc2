//! OFAuth Core - Request Dispatcher
//!
//! Translates a resource/operation selection plus per-record parameters into
//! one HTTP request per input record, and flattens each response into a
//! uniform stream of output records.
//!
//! The HTTP transport, the credential store and the failure policy are
//! collaborators passed in by the host:
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(client);
//! let output = dispatcher
//!     .execute(&batch, &StaticCredentials::new(credentials), &FailureMode::Continue)
//!     .await?;
//! ```

pub mod constants;
pub mod credentials;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod normalize;
pub mod params;
pub mod request;

pub use constants::*;
pub use credentials::{CredentialSource, Credentials, StaticCredentials};
pub use dispatch::{
    plan, prepare_request, Batch, Dispatcher, FailureMode, FailurePolicy, HttpClient, InputRecord,
};
pub use enums::{
    HttpMethod, Operation, OperationParseError, Resource, ResourceParseError, Selectors,
};
pub use error::{CredentialError, DispatchError, DispatchResult, RecordError, TransportError};
pub use normalize::{normalize, OutputRecord, ResponseShape};
pub use params::{resolve, AdditionalFields, BatchParameters, RecordOverrides, ResolvedParams};
pub use request::{build_request, request_path, RequestDescriptor};
