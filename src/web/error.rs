use crate::api::{ChatResponse, GENERATION_FAILED_MESSAGE, INVALID_QUERY_MESSAGE};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// Terminal outcomes of a chat request other than success.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Blank message, missing field, or a body that is not a JSON object.
    #[error("invalid chat input")]
    InvalidInput,

    /// The collaborator failed; the cause is logged, never returned.
    #[error("generation failed: {0}")]
    GenerationFailure(#[source] crate::Error),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::InvalidInput => StatusCode::BAD_REQUEST,
            ChatError::GenerationFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The user-safe message sent to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            ChatError::InvalidInput => INVALID_QUERY_MESSAGE,
            ChatError::GenerationFailure(_) => GENERATION_FAILED_MESSAGE,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        (self.status(), Json(ChatResponse::failure(self.public_message()))).into_response()
    }
}
