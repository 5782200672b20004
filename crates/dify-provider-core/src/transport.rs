use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::ProviderResult;
use crate::headers::Headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamHttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Bytes>,
    pub is_stream: bool,
}

#[derive(Debug, Clone)]
pub struct UpstreamHttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

/// Network seam. Model clients build requests; implementations of this trait
/// put them on the wire.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: UpstreamHttpRequest) -> ProviderResult<UpstreamHttpResponse>;
}

pub type SharedTransport = Arc<dyn HttpTransport>;
