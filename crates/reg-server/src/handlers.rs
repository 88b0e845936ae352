//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;

use reg_core::validate_registration;

use crate::app::AppState;
use crate::dto::RegistrationResponse;
use crate::error::ApiError;
use crate::extract::read_record;

/// `POST` handler: validate, store the marksheet, insert the record.
///
/// Nothing is written when validation fails.
pub async fn register_student(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let raw = read_record(request).await?;

    let draft = validate_registration(&raw).inspect_err(|errors| {
        tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "registration rejected");
    })?;

    let stored_path = state
        .uploads
        .store(draft.marksheet.bytes.clone(), &draft.marksheet.filename)
        .await?;
    let student = state.service.create_student(&draft, &stored_path).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse::new(student, &state.storage)),
    ))
}
