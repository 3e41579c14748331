//! `POST /api/chat`

use crate::api::{ChatRequest, ChatResponse};
use crate::state::AppState;
use crate::web::ChatError;
use axum::extract::{rejection::JsonRejection, State};
use axum::response::Json;
use tracing::Instrument;
use uuid::Uuid;

/// Validate the message, forward the trimmed prompt to the generator and
/// return its complete reply.
///
/// Invalid input never reaches the generator. Generator errors are logged
/// here, inside the request span, and reach the client only as the
/// generic failure payload.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            tracing::warn!(%rejection, "rejected chat request body");
            ChatError::InvalidInput
        })?;

        let Some(prompt) = request.prompt() else {
            tracing::debug!("rejected blank message");
            return Err(ChatError::InvalidInput);
        };

        tracing::info!(
            model = state.generator.model(),
            prompt_chars = prompt.chars().count(),
            "forwarding prompt"
        );

        let text = state.generator.generate_text(prompt).await.map_err(|e| {
            tracing::error!(error = %e, "generation failed");
            ChatError::GenerationFailure(e)
        })?;

        tracing::info!(reply_chars = text.chars().count(), "generation succeeded");
        Ok(Json(ChatResponse::reply(text)))
    }
    .instrument(span)
    .await
}
