//! Events produced while a generation streams in.

use serde::{Deserialize, Serialize};

/// Events a provider emits while decoding a streamed generation.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// A chunk of reply text.
    TextDelta { delta: String },
    /// The provider refused to answer; the reason is the provider's code.
    Blocked { reason: String },
    /// The candidate finished.
    Done {
        finish_reason: FinishReason,
        usage: Usage,
    },
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Reason why generation finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    Other(String),
}

impl FinishReason {
    /// Map a Gemini `finishReason` code. Blocking codes are not finish
    /// reasons here; they surface as [`GenerationEvent::Blocked`].
    pub fn from_gemini(code: &str) -> Self {
        match code {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::Length,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_finish_reasons() {
        assert_eq!(FinishReason::from_gemini("STOP"), FinishReason::Stop);
        assert_eq!(FinishReason::from_gemini("MAX_TOKENS"), FinishReason::Length);
        assert_eq!(
            FinishReason::from_gemini("MALFORMED_FUNCTION_CALL"),
            FinishReason::Other("MALFORMED_FUNCTION_CALL".to_string())
        );
    }
}
