use serde::{Deserialize, Serialize};

/// Prompt-side token accounting. Unset leaves mean the provider did not report
/// that category; they are never defaulted to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTokens {
    pub total: Option<u64>,
    pub no_cache: Option<u64>,
    pub cache_read: Option<u64>,
    pub cache_write: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTokens {
    pub total: Option<u64>,
    pub text: Option<u64>,
    pub reasoning: Option<u64>,
}

/// Standardized usage record. Every key is always present when serialized;
/// only values may be `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModelUsage {
    pub input_tokens: InputTokens,
    pub output_tokens: OutputTokens,
    /// Provider record as received, kept for diagnostics.
    pub raw: Option<serde_json::Value>,
}

impl LanguageModelUsage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}
