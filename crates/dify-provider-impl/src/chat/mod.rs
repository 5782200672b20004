use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use dify_provider_core::{
    Headers, HttpMethod, LanguageModelUsage, LanguageModelV3, ModelV3, ProviderError,
    ProviderResult, SharedTransport, UpstreamHttpRequest, UpstreamHttpResponse, header_extend,
    header_set,
};

use crate::api_key::{LoadApiKey, load_api_key, non_blank};
use crate::settings::DifyChatSettings;
use crate::usage::{DifyUsage, convert_dify_usage, convert_dify_usage_value};

const CHAT_MESSAGES_PATH: &str = "/chat-messages";

/// Provider-level configuration shared by every chat model the provider
/// creates. Read-only after construction.
#[derive(Clone)]
pub struct DifyChatConfig {
    pub provider: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub headers: Headers,
    pub transport: Option<SharedTransport>,
    pub(crate) api_key_env: &'static str,
}

impl DifyChatConfig {
    /// Computes request headers for one request.
    ///
    /// The key is resolved on every call: per-model key, then provider key,
    /// then `DIFY_API_KEY`. User headers are applied last and win.
    pub fn headers(&self, settings: &DifyChatSettings) -> ProviderResult<Headers> {
        let api_key = load_api_key(LoadApiKey {
            api_key: non_blank(settings.api_key.as_deref())
                .or_else(|| non_blank(self.api_key.as_deref())),
            environment_variable_name: self.api_key_env,
            description: "Dify API Key",
        })?;

        let mut headers = Headers::new();
        header_set(&mut headers, "Authorization", format!("Bearer {api_key}"));
        header_set(&mut headers, "Content-Type", "application/json");
        header_extend(&mut headers, &self.headers);
        Ok(headers)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for DifyChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DifyChatConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

/// Chat model client bound to one Dify app.
#[derive(Debug, Clone)]
pub struct DifyChatLanguageModel {
    model_id: String,
    settings: DifyChatSettings,
    config: Arc<DifyChatConfig>,
}

impl DifyChatLanguageModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: DifyChatSettings,
        config: Arc<DifyChatConfig>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
        }
    }

    pub fn settings(&self) -> &DifyChatSettings {
        &self.settings
    }

    pub fn config(&self) -> &DifyChatConfig {
        &self.config
    }

    pub fn request_headers(&self) -> ProviderResult<Headers> {
        self.config.headers(&self.settings)
    }

    pub fn chat_messages_url(&self) -> String {
        self.config.url(CHAT_MESSAGES_PATH)
    }

    /// Wraps a caller-built JSON body into a POST to the chat-messages
    /// endpoint. Headers are computed here, right before the request exists.
    pub fn build_request(
        &self,
        body: &serde_json::Value,
        is_stream: bool,
    ) -> ProviderResult<UpstreamHttpRequest> {
        let headers = self.request_headers()?;
        let body = serde_json::to_vec(body).map_err(|err| ProviderError::Other(err.to_string()))?;
        Ok(UpstreamHttpRequest {
            method: HttpMethod::Post,
            url: self.chat_messages_url(),
            headers,
            body: Some(Bytes::from(body)),
            is_stream,
        })
    }

    pub async fn send(&self, request: UpstreamHttpRequest) -> ProviderResult<UpstreamHttpResponse> {
        let Some(transport) = self.config.transport.as_ref() else {
            return Err(ProviderError::Unsupported("transport"));
        };
        transport.send(request).await
    }

    pub fn convert_usage(&self, usage: Option<&DifyUsage>) -> LanguageModelUsage {
        convert_dify_usage(usage)
    }
}

impl ModelV3 for DifyChatLanguageModel {
    fn provider(&self) -> &str {
        &self.config.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl LanguageModelV3 for DifyChatLanguageModel {
    fn usage_from_raw(&self, raw: &serde_json::Value) -> LanguageModelUsage {
        convert_dify_usage_value(raw)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dify_provider_core::header_get;

    pub(crate) const UNSET_ENV: &str = "DIFY_PROVIDER_IMPL_TEST_UNSET_API_KEY";

    pub(crate) fn config(api_key: Option<&str>, headers: Headers) -> DifyChatConfig {
        DifyChatConfig {
            provider: "dify.chat".to_string(),
            base_url: "https://api.dify.ai/v1".to_string(),
            api_key: api_key.map(str::to_string),
            headers,
            transport: None,
            api_key_env: UNSET_ENV,
        }
    }

    #[test]
    fn headers_carry_bearer_and_content_type() {
        let headers = config(Some("app-provider"), Vec::new())
            .headers(&DifyChatSettings::default())
            .unwrap();
        assert_eq!(
            headers,
            vec![
                ("Authorization".to_string(), "Bearer app-provider".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn per_model_key_beats_provider_key() {
        let headers = config(Some("app-provider"), Vec::new())
            .headers(&DifyChatSettings::with_api_key("app-model"))
            .unwrap();
        assert_eq!(header_get(&headers, "authorization"), Some("Bearer app-model"));
    }

    #[test]
    fn blank_per_model_key_falls_back_to_provider_key() {
        let headers = config(Some("app-provider"), Vec::new())
            .headers(&DifyChatSettings::with_api_key(" "))
            .unwrap();
        assert_eq!(
            header_get(&headers, "authorization"),
            Some("Bearer app-provider")
        );
    }

    #[test]
    fn missing_key_everywhere_fails() {
        let err = config(None, Vec::new())
            .headers(&DifyChatSettings::default())
            .unwrap_err();
        assert!(err.is_missing_credential());
    }

    #[test]
    fn custom_headers_are_appended_and_win_on_collision() {
        let custom = vec![
            ("content-type".to_string(), "application/vnd.dify+json".to_string()),
            ("Authorization".to_string(), "Bearer gateway".to_string()),
            ("X-Tenant".to_string(), "acme".to_string()),
        ];
        let headers = config(Some("app-provider"), custom)
            .headers(&DifyChatSettings::default())
            .unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(
            header_get(&headers, "Content-Type"),
            Some("application/vnd.dify+json")
        );
        assert_eq!(header_get(&headers, "authorization"), Some("Bearer gateway"));
        assert_eq!(header_get(&headers, "x-tenant"), Some("acme"));
    }

    #[test]
    fn build_request_targets_chat_messages() {
        let model = DifyChatLanguageModel::new(
            "support-bot",
            DifyChatSettings::default(),
            Arc::new(config(Some("app-provider"), Vec::new())),
        );
        let body = serde_json::json!({"query": "hi", "response_mode": "blocking"});
        let req = model.build_request(&body, false).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://api.dify.ai/v1/chat-messages");
        assert!(!req.is_stream);
        assert_eq!(
            header_get(&req.headers, "authorization"),
            Some("Bearer app-provider")
        );
        let sent: serde_json::Value =
            serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn build_request_fails_without_key() {
        let model = DifyChatLanguageModel::new(
            "support-bot",
            DifyChatSettings::default(),
            Arc::new(config(None, Vec::new())),
        );
        let err = model
            .build_request(&serde_json::json!({}), true)
            .unwrap_err();
        assert!(err.is_missing_credential());
    }

    fn config_with_env(api_key: Option<&str>, env_name: &'static str) -> DifyChatConfig {
        DifyChatConfig {
            api_key_env: env_name,
            ..config(api_key, Vec::new())
        }
    }

    #[test]
    fn env_key_is_used_when_settings_have_none() {
        const ENV: &str = "DIFY_PROVIDER_IMPL_TEST_ENV_ONLY_API_KEY";
        // Name is unique to this test; no other test reads it.
        unsafe { std::env::set_var(ENV, "app-env") };
        let headers = config_with_env(None, ENV)
            .headers(&DifyChatSettings::default())
            .unwrap();
        assert_eq!(header_get(&headers, "authorization"), Some("Bearer app-env"));
    }

    #[test]
    fn provider_key_beats_env_key() {
        const ENV: &str = "DIFY_PROVIDER_IMPL_TEST_SHADOWED_API_KEY";
        unsafe { std::env::set_var(ENV, "app-env") };
        let config = config_with_env(Some("app-provider"), ENV);

        let headers = config.headers(&DifyChatSettings::default()).unwrap();
        assert_eq!(
            header_get(&headers, "authorization"),
            Some("Bearer app-provider")
        );

        let headers = config
            .headers(&DifyChatSettings::with_api_key("app-model"))
            .unwrap();
        assert_eq!(header_get(&headers, "authorization"), Some("Bearer app-model"));
    }
}
