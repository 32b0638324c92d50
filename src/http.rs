//! HTTP client trait for talking to the Smart-ID REST API.

use async_trait::async_trait;

/// HTTP request to be sent by an HTTP client.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The URL to send the request to.
    pub url: String,
    /// The HTTP method and optional body.
    pub method: HttpMethod,
    /// Additional header pairs. The relying-party bearer token travels here.
    pub headers: Vec<(String, String)>,
}

/// HTTP method with optional body for POST requests.
#[derive(Debug, Clone)]
pub enum HttpMethod {
    /// HTTP GET request.
    Get,
    /// HTTP POST request with body and content type.
    Post { body: Vec<u8>, content_type: String },
}

/// HTTP response from an HTTP client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

/// Low-level HTTP client trait.
///
/// This trait provides a pure HTTP interface with no knowledge of Smart-ID
/// semantics: implementors receive a fully-formed request (URL, body,
/// authorization header) and hand back the raw status and body. Implementors
/// must not retry or loop; the caller owns polling cadence.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// The error type returned by this HTTP client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an HTTP request and return the response.
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}
