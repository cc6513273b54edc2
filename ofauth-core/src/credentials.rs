//! Credential values and the source they are resolved from.

use crate::error::CredentialError;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// API credentials for one batch.
///
/// The key is wrapped in a `SecretString` so it never shows up in `Debug`
/// output or logs.
#[derive(Debug)]
pub struct Credentials {
    api_key: SecretString,
    connection_id: Option<String>,
}

impl Credentials {
    /// Build credentials, rejecting a blank API key.
    ///
    /// A blank connection ID is stored as absent.
    pub fn new(
        api_key: impl Into<String>,
        connection_id: Option<String>,
    ) -> Result<Self, CredentialError> {
        let api_key: String = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CredentialError::MissingApiKey);
        }
        let connection_id = connection_id.filter(|id| !id.trim().is_empty());
        Ok(Self {
            api_key: SecretString::new(api_key.into()),
            connection_id,
        })
    }

    /// Expose the raw key for header construction.
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Default connection ID, used when a record resolves none of its own.
    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }
}

/// Supplies credentials once per batch.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn credentials(&self) -> Result<Arc<Credentials>, CredentialError>;
}

/// Credential source over a fixed value.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    inner: Arc<Credentials>,
}

impl StaticCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(credentials),
        }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn credentials(&self) -> Result<Arc<Credentials>, CredentialError> {
        Ok(Arc::clone(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_rejected() {
        assert_eq!(
            Credentials::new("  ", None).unwrap_err(),
            CredentialError::MissingApiKey
        );
    }

    #[test]
    fn test_blank_connection_id_is_absent() {
        let creds = Credentials::new("key", Some(String::new())).unwrap();
        assert_eq!(creds.connection_id(), None);

        let creds = Credentials::new("key", Some("conn_1".to_string())).unwrap();
        assert_eq!(creds.connection_id(), Some("conn_1"));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let creds = Credentials::new("sk_live_secret", None).unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk_live_secret"));
        assert_eq!(creds.api_key(), "sk_live_secret");
    }

    #[tokio::test]
    async fn test_static_source_returns_same_credentials() {
        let source = StaticCredentials::new(Credentials::new("key", None).unwrap());
        let first = source.credentials().await.unwrap();
        let second = source.credentials().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
