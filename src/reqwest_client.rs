//! Reqwest-based HTTP client, the default transport.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};

/// Simple HTTP client implementation using reqwest.
///
/// One instance can safely serve any number of concurrent sessions.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default settings.
    ///
    /// Default timeout: 30 seconds. Status polls with a long-poll hint
    /// larger than that should use [`with_timeout`](Self::with_timeout).
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let url = &request.url;

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post { body, content_type } => self
                .client
                .post(url)
                .header("Content-Type", content_type)
                .body(body),
        };
        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        let response = req_builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}
