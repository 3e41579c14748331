use crate::Error;

/// The external text-generation collaborator.
///
/// Built once at startup and shared read-only across request tasks.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Generate the complete reply for a single prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, Error>;

    /// The model identifier requests are sent to.
    fn model(&self) -> &str;
}
