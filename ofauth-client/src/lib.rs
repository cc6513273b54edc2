//! OFAuth Client
//!
//! Host-side pieces around the core dispatcher: a `reqwest` transport,
//! TOML configuration, tracing setup and the `ofauth` command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod rest;
pub mod telemetry;

pub use config::{ClientConfig, ConfigError, LogFormat};
pub use error::{CliError, ClientError};
pub use rest::RestClient;
