use tracing::warn;

use dify_provider_core::{ProviderError, ProviderResult};

pub const DIFY_API_KEY_ENV: &str = "DIFY_API_KEY";

#[derive(Debug, Clone, Copy)]
pub struct LoadApiKey<'a> {
    /// Explicitly configured key; wins over the environment when non-blank.
    pub api_key: Option<&'a str>,
    pub environment_variable_name: &'a str,
    /// Human-readable name used in the missing-key error.
    pub description: &'a str,
}

/// Resolved keys are returned trimmed of surrounding whitespace.
pub fn load_api_key(options: LoadApiKey<'_>) -> ProviderResult<String> {
    if let Some(api_key) = non_blank(options.api_key) {
        return Ok(api_key.to_string());
    }

    let from_env = std::env::var(options.environment_variable_name).ok();
    if let Some(api_key) = sanitize_env_value(from_env.as_deref()) {
        return Ok(api_key.to_string());
    }
    if from_env.is_some() {
        warn!(
            env = options.environment_variable_name,
            "ignoring blank or unresolved api key environment variable"
        );
    }

    Err(ProviderError::LoadApiKey {
        description: options.description.to_string(),
        environment_variable_name: options.environment_variable_name.to_string(),
    })
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn sanitize_env_value(value: Option<&str>) -> Option<&str> {
    let trimmed = non_blank(value)?;
    // Some PaaS systems inject unresolved placeholders like `${VAR}`.
    if trimmed.starts_with("${") && trimmed.ends_with('}') {
        return None;
    }
    Some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET_ENV: &str = "DIFY_PROVIDER_IMPL_TEST_UNSET_API_KEY";

    #[test]
    fn explicit_key_is_used_and_trimmed() {
        let key = load_api_key(LoadApiKey {
            api_key: Some("  app-123 "),
            environment_variable_name: UNSET_ENV,
            description: "Dify API Key",
        })
        .unwrap();
        assert_eq!(key, "app-123");
    }

    #[test]
    fn blank_key_falls_through_to_missing() {
        let err = load_api_key(LoadApiKey {
            api_key: Some("   "),
            environment_variable_name: UNSET_ENV,
            description: "Dify API Key",
        })
        .unwrap_err();
        assert_eq!(
            err,
            ProviderError::LoadApiKey {
                description: "Dify API Key".to_string(),
                environment_variable_name: UNSET_ENV.to_string(),
            }
        );
    }

    #[test]
    fn env_placeholders_are_treated_as_unset() {
        assert_eq!(sanitize_env_value(Some("${DIFY_API_KEY}")), None);
        assert_eq!(sanitize_env_value(Some("")), None);
        assert_eq!(sanitize_env_value(None), None);
        assert_eq!(sanitize_env_value(Some(" app-9 ")), Some("app-9"));
    }
}
