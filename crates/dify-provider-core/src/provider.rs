use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ProviderError, ProviderResult};
use crate::usage::LanguageModelUsage;

/// Version tag of the provider interface, checked by the abstraction layer
/// before it talks to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecificationVersion {
    V3,
}

impl SpecificationVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecificationVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for SpecificationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model capability a provider can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelType {
    LanguageModel,
    EmbeddingModel,
    ImageModel,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::LanguageModel => "languageModel",
            ModelType::EmbeddingModel => "embeddingModel",
            ModelType::ImageModel => "imageModel",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a host invoked the provider entry point when dispatching generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Function,
    Constructor,
}

pub trait ModelV3: Send + Sync {
    fn specification_version(&self) -> SpecificationVersion {
        SpecificationVersion::V3
    }

    /// Provider label, e.g. `dify.chat`.
    fn provider(&self) -> &str;

    fn model_id(&self) -> &str;
}

pub trait LanguageModelV3: ModelV3 {
    /// Translates a decoded provider usage fragment into the standardized shape.
    fn usage_from_raw(&self, raw: &serde_json::Value) -> LanguageModelUsage;
}

pub trait EmbeddingModelV3: ModelV3 {}

pub trait ImageModelV3: ModelV3 {}

/// A factory of model clients.
///
/// Only `language_model` is required. `chat`, `call` and `invoke` delegate to
/// it; embedding and image models report `NoSuchModel` unless overridden.
pub trait ProviderV3: Send + Sync {
    type LanguageModel: LanguageModelV3;
    type ModelSettings: Default;

    fn specification_version(&self) -> SpecificationVersion {
        SpecificationVersion::V3
    }

    fn language_model(
        &self,
        model_id: &str,
        settings: Self::ModelSettings,
    ) -> Self::LanguageModel;

    fn language_model_default(&self, model_id: &str) -> Self::LanguageModel {
        self.language_model(model_id, Self::ModelSettings::default())
    }

    fn chat(&self, model_id: &str, settings: Self::ModelSettings) -> Self::LanguageModel {
        self.language_model(model_id, settings)
    }

    /// Convenience entry point: calling the provider directly.
    fn call(&self, model_id: &str, settings: Self::ModelSettings) -> Self::LanguageModel {
        self.language_model(model_id, settings)
    }

    fn invoke(
        &self,
        mode: CallMode,
        model_id: &str,
        settings: Self::ModelSettings,
    ) -> ProviderResult<Self::LanguageModel> {
        match mode {
            CallMode::Function => Ok(self.call(model_id, settings)),
            CallMode::Constructor => Err(ProviderError::ConstructorCall),
        }
    }

    fn embedding_model(&self, model_id: &str) -> ProviderResult<Box<dyn EmbeddingModelV3>> {
        Err(ProviderError::NoSuchModel {
            model_id: model_id.to_string(),
            model_type: ModelType::EmbeddingModel,
        })
    }

    fn image_model(&self, model_id: &str) -> ProviderResult<Box<dyn ImageModelV3>> {
        Err(ProviderError::NoSuchModel {
            model_id: model_id.to_string(),
            model_type: ModelType::ImageModel,
        })
    }
}
