//! Dify provider for the language-model abstraction layer.
//!
//! This crate does not perform network IO. Model clients compute headers and
//! build `UpstreamHttpRequest` envelopes; sending them is delegated to the
//! transport configured in `DifyProviderSettings`.

mod api_key;
mod chat;
mod provider;
mod settings;
mod usage;

pub use api_key::{DIFY_API_KEY_ENV, LoadApiKey, load_api_key};
pub use chat::{DifyChatConfig, DifyChatLanguageModel};
pub use provider::{DEFAULT_BASE_URL, DifyProvider, PROVIDER_LABEL, create_dify_provider};
pub use settings::{DifyChatSettings, DifyProviderSettings};
pub use usage::{DifyUsage, convert_dify_usage, convert_dify_usage_value};
