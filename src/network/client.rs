//! HTTP transport - plain request/response data and the reqwest-backed sender

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::models::{HttpMethod, RequestInfo};

/// An HTTP request described as plain data
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl From<&RequestInfo> for HttpRequest {
    fn from(info: &RequestInfo) -> Self {
        HttpRequest {
            method: info.method,
            url: info.url.clone(),
            headers: info.headers.clone(),
            body: info.body.as_ref().map(|body| body.to_string()),
        }
    }
}

/// An HTTP response described as plain data
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// No response was received
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
        }
    }
}

/// Sends one request; never retries
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Transport backed by a shared reqwest client
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        ReqwestTransport {
            client: create_client(timeout),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

/// Build a request from the given parameters
fn build_request(client: &reqwest::Client, request: &HttpRequest) -> reqwest::RequestBuilder {
    let mut req_builder = match request.method {
        HttpMethod::GET => client.get(&request.url),
        HttpMethod::POST => client.post(&request.url),
        HttpMethod::PUT => client.put(&request.url),
        HttpMethod::PATCH => client.patch(&request.url),
        HttpMethod::DELETE => client.delete(&request.url),
    };

    for (key, value) in &request.headers {
        req_builder = req_builder.header(key, value);
    }

    if let Some(body) = &request.body {
        req_builder = req_builder.body(body.clone());
    }

    req_builder
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let resp = build_request(&self.client, &request).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::new("Request timed out")
            } else if e.is_connect() {
                TransportError::new(format!("Connection failed: {}", e))
            } else {
                TransportError::new(format!("Request failed: {}", e))
            }
        })?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Error reading body: {}", e)))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Create an HTTP client with default configuration
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
