#![allow(dead_code)]

use gemini_chat::{Error, TextGenerator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted collaborator that records every prompt it receives.
pub struct FakeGenerator {
    outcome: Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with_outcome(Ok(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Err(message.to_string()))
    }

    fn with_outcome(outcome: Result<String, String>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(Error::provider("Fake", message.clone())),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// Gemini SSE body streaming `parts` as separate chunks, then a STOP.
pub fn gemini_sse(parts: &[&str]) -> String {
    let mut body = String::new();
    for (i, part) in parts.iter().enumerate() {
        let mut chunk = serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": part }] } }]
        });
        if i + 1 == parts.len() {
            chunk["candidates"][0]["finishReason"] = "STOP".into();
            chunk["usageMetadata"] = serde_json::json!({
                "promptTokenCount": 3,
                "candidatesTokenCount": parts.len(),
                "totalTokenCount": 3 + parts.len()
            });
        }
        body.push_str(&format!("data: {chunk}\r\n\r\n"));
    }
    body
}
