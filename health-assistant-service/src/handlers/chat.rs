use crate::dtos::{ChatRequest, ChatResponse, ResponseStatus};
use crate::startup::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

#[tracing::instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(rejection = %rejection.body_text(), "Rejected chat request body");
        AppError::BadRequest(anyhow::anyhow!("Message cannot be empty"))
    })?;

    request
        .validate()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Message cannot be empty")))?;

    let consultation = state.assistant.consult(&request.message).await.map_err(|e| {
        tracing::error!(error = %e, "Error processing health query");
        AppError::InternalError(anyhow::Error::new(e))
    })?;

    tracing::info!(
        message_len = request.message.len(),
        department = ?consultation.recommended_department(),
        "Health query answered"
    );

    Ok(Json(ChatResponse {
        response: consultation.render(),
        status: ResponseStatus::Success,
    }))
}
