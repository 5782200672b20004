use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use dify_provider_core::{InputTokens, LanguageModelUsage, OutputTokens};

/// Usage block of a Dify chat response (`metadata.usage`).
///
/// Dify reports pricing and latency next to the token counts; those fields
/// are kept in `extra` so the raw record survives untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifyUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DifyUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
            extra: Map::new(),
        }
    }

    pub fn to_raw(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert("prompt_tokens".to_string(), self.prompt_tokens.into());
        map.insert(
            "completion_tokens".to_string(),
            self.completion_tokens.into(),
        );
        map.insert("total_tokens".to_string(), self.total_tokens.into());
        Value::Object(map)
    }
}

pub fn convert_dify_usage(usage: Option<&DifyUsage>) -> LanguageModelUsage {
    let Some(usage) = usage else {
        return LanguageModelUsage::empty();
    };

    // `total_tokens` is passed through as-is, even when it disagrees.
    if usage.prompt_tokens.checked_add(usage.completion_tokens) != Some(usage.total_tokens) {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "dify usage total does not match prompt + completion"
        );
    }

    let prompt_tokens = usage.prompt_tokens;
    let completion_tokens = usage.completion_tokens;

    LanguageModelUsage {
        input_tokens: InputTokens {
            total: Some(prompt_tokens),
            no_cache: Some(prompt_tokens),
            cache_read: None,
            cache_write: None,
        },
        output_tokens: OutputTokens {
            total: Some(completion_tokens),
            text: Some(completion_tokens),
            reasoning: None,
        },
        raw: Some(usage.to_raw()),
    }
}

/// Same as `convert_dify_usage`, for an already decoded JSON fragment.
/// `null` and fragments that are not a Dify usage record count as absent.
pub fn convert_dify_usage_value(value: &Value) -> LanguageModelUsage {
    if value.is_null() {
        return LanguageModelUsage::empty();
    }
    match DifyUsage::deserialize(value) {
        Ok(usage) => convert_dify_usage(Some(&usage)),
        Err(err) => {
            debug!(error = %err, "ignoring malformed dify usage fragment");
            LanguageModelUsage::empty()
        }
    }
}
