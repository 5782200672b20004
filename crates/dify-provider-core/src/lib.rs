//! Core language-model provider abstractions.
//!
//! This crate intentionally does **not** depend on any concrete HTTP client.
//! Providers construct `UpstreamHttpRequest` envelopes and hand them to a
//! caller-supplied `HttpTransport`; a higher layer performs IO.

pub mod errors;
pub mod headers;
pub mod provider;
pub mod transport;
pub mod usage;

pub use errors::{ProviderError, ProviderResult};
pub use headers::{Headers, header_extend, header_get, header_remove, header_set};
pub use provider::{
    CallMode, EmbeddingModelV3, ImageModelV3, LanguageModelV3, ModelType, ModelV3, ProviderV3,
    SpecificationVersion,
};
pub use transport::{
    HttpMethod, HttpTransport, SharedTransport, UpstreamHttpRequest, UpstreamHttpResponse,
};
pub use usage::{InputTokens, LanguageModelUsage, OutputTokens};
