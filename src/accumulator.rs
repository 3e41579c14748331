//! Delta accumulation for streamed generations.

use crate::types::{FinishReason, GenerationEvent, Usage};
use crate::Error;

/// A complete, buffered generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

/// Accumulates streaming events into a complete [`Generation`].
#[derive(Debug, Default)]
pub struct GenerationAccumulator {
    text: String,
    received_any: bool,
    blocked: Option<String>,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
}

impl GenerationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a stream event and update the accumulation.
    pub fn process_event(&mut self, event: GenerationEvent) {
        self.received_any = true;
        match event {
            GenerationEvent::TextDelta { delta } => self.text.push_str(&delta),
            GenerationEvent::Blocked { reason } => {
                self.blocked.get_or_insert(reason);
            }
            GenerationEvent::Done {
                finish_reason,
                usage,
            } => {
                self.finish_reason = Some(finish_reason);
                self.usage = Some(usage);
            }
        }
    }

    /// Finalize the accumulation.
    ///
    /// A blocked generation is an error even if some text arrived first,
    /// and so is a stream that produced no events at all.
    pub fn finalize(self) -> Result<Generation, Error> {
        if let Some(reason) = self.blocked {
            return Err(Error::blocked(reason));
        }
        if !self.received_any {
            return Err(Error::EmptyResponse);
        }
        Ok(Generation {
            text: self.text,
            finish_reason: self.finish_reason.unwrap_or(FinishReason::Stop),
            usage: self.usage.unwrap_or_default(),
        })
    }
}
