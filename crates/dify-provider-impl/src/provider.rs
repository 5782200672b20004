use std::sync::Arc;

use tracing::debug;

use dify_provider_core::ProviderV3;

use crate::api_key::DIFY_API_KEY_ENV;
use crate::chat::{DifyChatConfig, DifyChatLanguageModel};
use crate::settings::{DifyChatSettings, DifyProviderSettings};

pub const PROVIDER_LABEL: &str = "dify.chat";
pub const DEFAULT_BASE_URL: &str = "https://api.dify.ai/v1";

/// Factory of Dify chat model clients.
///
/// Every model created by one provider shares the same captured settings.
/// Nothing is resolved at creation time; keys are looked up when a model
/// computes its request headers.
#[derive(Debug, Clone)]
pub struct DifyProvider {
    config: Arc<DifyChatConfig>,
}

pub fn create_dify_provider(settings: DifyProviderSettings) -> DifyProvider {
    let base_url = settings
        .base_url
        .as_deref()
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string();
    debug!(
        base_url = %base_url,
        custom_headers = settings.headers.len(),
        custom_transport = settings.transport.is_some(),
        "dify provider created"
    );
    DifyProvider {
        config: Arc::new(DifyChatConfig {
            provider: PROVIDER_LABEL.to_string(),
            base_url,
            api_key: settings.api_key,
            headers: settings.headers,
            transport: settings.transport,
            api_key_env: DIFY_API_KEY_ENV,
        }),
    }
}

impl DifyProvider {
    pub fn new(settings: DifyProviderSettings) -> Self {
        create_dify_provider(settings)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn create_chat_model(
        &self,
        model_id: &str,
        settings: DifyChatSettings,
    ) -> DifyChatLanguageModel {
        debug!(model_id, provider = %self.config.provider, "dify chat model created");
        DifyChatLanguageModel::new(model_id, settings, self.config.clone())
    }
}

impl Default for DifyProvider {
    fn default() -> Self {
        create_dify_provider(DifyProviderSettings::default())
    }
}

impl ProviderV3 for DifyProvider {
    type LanguageModel = DifyChatLanguageModel;
    type ModelSettings = DifyChatSettings;

    fn language_model(
        &self,
        model_id: &str,
        settings: DifyChatSettings,
    ) -> DifyChatLanguageModel {
        self.create_chat_model(model_id, settings)
    }

    fn chat(&self, model_id: &str, settings: DifyChatSettings) -> DifyChatLanguageModel {
        self.create_chat_model(model_id, settings)
    }
}
