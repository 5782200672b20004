use crate::provider::ModelType;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The provider is a factory function; constructor-style invocation is a
    /// programming error on the caller's side.
    #[error("the model factory function cannot be called as a constructor")]
    ConstructorCall,
    #[error("no such {model_type}: {model_id}")]
    NoSuchModel {
        model_id: String,
        model_type: ModelType,
    },
    #[error(
        "{description} is missing. Pass it using the `api_key` setting or the \
         {environment_variable_name} environment variable."
    )]
    LoadApiKey {
        description: String,
        environment_variable_name: String,
    },
    #[error("transport: {0}")]
    Transport(String),
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn is_no_such_model(&self) -> bool {
        matches!(self, ProviderError::NoSuchModel { .. })
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, ProviderError::LoadApiKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_model_names_kind_and_id() {
        let err = ProviderError::NoSuchModel {
            model_id: "text-embedding".to_string(),
            model_type: ModelType::EmbeddingModel,
        };
        assert!(err.is_no_such_model());
        assert!(!err.is_missing_credential());
        assert_eq!(err.to_string(), "no such embeddingModel: text-embedding");
    }

    #[test]
    fn load_api_key_message_mentions_env_var() {
        let err = ProviderError::LoadApiKey {
            description: "Dify API Key".to_string(),
            environment_variable_name: "DIFY_API_KEY".to_string(),
        };
        assert!(err.is_missing_credential());
        assert_eq!(
            err.to_string(),
            "Dify API Key is missing. Pass it using the `api_key` setting or the \
             DIFY_API_KEY environment variable."
        );
    }
}
