//! Owner label and voice-enrollment handlers.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::owner::{OwnerResponse, SetEnrollmentRequest, SetOwnerRequest};
use crate::state::{AppState, Session};

fn owner_view(session: &Session) -> OwnerResponse {
    OwnerResponse {
        owner_label: session.owner_label().to_string(),
        enrolled: session.is_enrolled(),
    }
}

/// `GET /owner`
pub async fn get_owner(State(state): State<AppState>) -> Result<Json<OwnerResponse>, ApiError> {
    let session = state.session.lock().await;
    Ok(Json(owner_view(&session)))
}

/// Sets the label stamped on future saved bills.
///
/// `PUT /owner`
pub async fn set_owner(
    State(state): State<AppState>,
    Json(req): Json<SetOwnerRequest>,
) -> Result<Json<OwnerResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.set_owner_label(&req.owner_label)?;
    Ok(Json(owner_view(&session)))
}

/// Records whether the current owner has completed voice enrollment.
///
/// `PUT /owner/enrollment`
pub async fn set_enrollment(
    State(state): State<AppState>,
    Json(req): Json<SetEnrollmentRequest>,
) -> Result<Json<OwnerResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let owner = session.owner_label().to_string();
    if owner.is_empty() {
        return Err(ApiError::BadRequest(
            "set an owner label before enrolling".to_string(),
        ));
    }
    session.set_enrollment(&owner, req.enrolled)?;
    Ok(Json(owner_view(&session)))
}
