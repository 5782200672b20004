use std::fmt;

use serde::{Deserialize, Serialize};

use dify_provider_core::{Headers, SharedTransport, headers};

/// Provider-wide settings, captured once by `create_dify_provider`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DifyProviderSettings {
    /// URL prefix for API calls, e.g. a self-hosted Dify instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Extra request headers, applied after the computed ones.
    #[serde(default, with = "headers::as_map", skip_serializing_if = "Vec::is_empty")]
    pub headers: Headers,
    /// Replaces the default network path, e.g. for middleware or tests.
    #[serde(skip)]
    pub transport: Option<SharedTransport>,
}

impl DifyProviderSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        dify_provider_core::header_set(&mut self.headers, name, value);
        self
    }

    pub fn with_transport(mut self, transport: SharedTransport) -> Self {
        self.transport = Some(transport);
        self
    }
}

impl fmt::Debug for DifyProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DifyProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

/// Per-model settings passed to `language_model` / `chat`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifyChatSettings {
    /// Overrides the provider-level key for this model client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl DifyChatSettings {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }
}

impl fmt::Debug for DifyChatSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DifyChatSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
