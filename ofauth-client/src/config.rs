//! Configuration loading for the OFAuth client.
//!
//! Only `request_timeout_ms` is required in the file. Credentials may come
//! from the file or from `OFAUTH_API_KEY` / `OFAUTH_CONNECTION_ID`, the
//! environment taking precedence.

use ofauth_core::{CredentialError, Credentials, FailureMode, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "OFAUTH_CONFIG";
pub const API_KEY_ENV: &str = "OFAUTH_API_KEY";
pub const CONNECTION_ID_ENV: &str = "OFAUTH_CONNECTION_ID";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub continue_on_failure: bool,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    pub api_key: Option<String>,
    pub connection_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or OFAUTH_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    /// Load from `path`, falling back to `OFAUTH_CONFIG`, then apply
    /// environment credentials and validate.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?.with_credential_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(CONNECTION_ID_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Replace file credentials with the given values where present and
    /// non-empty.
    pub fn with_credential_overrides(
        mut self,
        api_key: Option<String>,
        connection_id: Option<String>,
    ) -> Self {
        if let Some(api_key) = api_key.filter(|k| !k.is_empty()) {
            self.credentials.api_key = Some(api_key);
        }
        if let Some(connection_id) = connection_id.filter(|c| !c.is_empty()) {
            self.credentials.connection_id = Some(connection_id);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "must be an http(s) URL".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        let has_key = self
            .credentials
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if !has_key {
            return Err(ConfigError::InvalidValue {
                field: "credentials.api_key",
                reason: format!("must be provided in the file or via {}", API_KEY_ENV),
            });
        }
        Ok(())
    }

    pub fn credentials(&self) -> Result<Credentials, CredentialError> {
        let api_key = self
            .credentials
            .api_key
            .clone()
            .ok_or(CredentialError::MissingApiKey)?;
        Credentials::new(api_key, self.credentials.connection_id.clone())
    }

    pub fn failure_mode(&self) -> FailureMode {
        FailureMode::from_flag(self.continue_on_failure)
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        request_timeout_ms = 30000

        [credentials]
        api_key = "file-key"
    "#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = ClientConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.base_url, "https://api-next.ofauth.com");
        assert!(!config.continue_on_failure);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.failure_mode(), FailureMode::Abort);
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = ClientConfig::from_toml_str("request_timeout_ms = 1\nretries = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_reports_field() {
        let mut config = ClientConfig::from_toml_str(MINIMAL).unwrap();
        config.request_timeout_ms = 0;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "request_timeout_ms"),
            other => panic!("unexpected: {:?}", other),
        }

        let mut config = ClientConfig::from_toml_str(MINIMAL).unwrap();
        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let config = ClientConfig::from_toml_str("request_timeout_ms = 1000\n").unwrap();
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "credentials.api_key"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = ClientConfig::from_toml_str(MINIMAL)
            .unwrap()
            .with_credential_overrides(Some("env-key".to_string()), Some("conn_env".to_string()));
        let creds = config.credentials().unwrap();
        assert_eq!(creds.api_key(), "env-key");
        assert_eq!(creds.connection_id(), Some("conn_env"));

        let config = ClientConfig::from_toml_str(MINIMAL)
            .unwrap()
            .with_credential_overrides(Some(String::new()), None);
        assert_eq!(config.credentials().unwrap().api_key(), "file-key");
    }

    #[test]
    fn test_empty_overrides_keep_file_credentials() {
        let file = "request_timeout_ms = 1000\n[credentials]\napi_key = \"file-key\"\nconnection_id = \"conn_file\"\n";
        let config = ClientConfig::from_toml_str(file)
            .unwrap()
            .with_credential_overrides(Some(String::new()), Some(String::new()));
        let creds = config.credentials().unwrap();
        assert_eq!(creds.api_key(), "file-key");
        assert_eq!(creds.connection_id(), Some("conn_file"));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"http://localhost:8080\"\nrequest_timeout_ms = 500\ncontinue_on_failure = true\nlog_format = \"json\"\n[credentials]\napi_key = \"k\"\nconnection_id = \"conn_1\""
        )
        .unwrap();
        let config = ClientConfig::from_path(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.failure_mode(), FailureMode::Continue);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.credentials().unwrap().connection_id(), Some("conn_1"));
    }
}
