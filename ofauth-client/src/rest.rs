//! reqwest-backed HTTP client for the dispatcher.

use crate::config::ClientConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use ofauth_core::{HttpClient, HttpMethod, RequestDescriptor, TransportError, JSON_CONTENT_TYPE};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a descriptor into a ready-to-send request against the base URL.
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Request, ClientError> {
        let url = format!("{}{}", self.base_url, descriptor.url);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        for (name, value) in &descriptor.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            headers.insert(header_name, header_value);
        }

        let mut request = self
            .client
            .request(to_method(descriptor.method), url)
            .headers(headers);
        if descriptor.query.is_some() {
            request = request.query(&descriptor.query_pairs());
        }
        Ok(request.build()?)
    }

    async fn parse_response(response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        let text = response.text().await.map_err(|e| TransportError::Decode {
            message: e.to_string(),
        })?;
        classify_response(status, &text)
    }
}

/// Map a status and body to the JSON payload or a transport error.
///
/// 204 and empty bodies become `null`.
fn classify_response(status: StatusCode, body: &str) -> Result<Value, TransportError> {
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            message: error_message(status, body),
        });
    }

    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| TransportError::Decode {
        message: e.to_string(),
    })
}

#[async_trait]
impl HttpClient for RestClient {
    async fn send(&self, descriptor: &RequestDescriptor) -> Result<Value, TransportError> {
        let request = self
            .build_request(descriptor)
            .map_err(|e| TransportError::Network {
                message: e.to_string(),
            })?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TransportError::Network {
                message: e.to_string(),
            })?;
        Self::parse_response(response).await
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Best human-readable message for an error response.
///
/// Prefers a `message` (or `error`) string in a JSON body, then the raw body,
/// then the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = json.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}
