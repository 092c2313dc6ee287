//! Handlers for the `/api/auth/profile` resource.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use chesstrainer_core::error::CoreError;
use chesstrainer_db::models::user::UpdateProfile;
use chesstrainer_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserInfo;
use crate::middleware::auth::AuthSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /api/auth/profile`. The email address cannot
/// be changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
}

/// GET /api/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    let user_id = session.identity.user_id;
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserInfo::from(&user),
    }))
}

/// PATCH /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    session: AuthSession,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    input.validate()?;

    let user_id = session.identity.user_id;
    let update = UpdateProfile {
        first_name: input.first_name.map(|s| s.trim().to_string()),
        last_name: input.last_name.map(|s| s.trim().to_string()),
    };

    let user = UserRepo::update_profile(&state.pool, user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserInfo::from(&user),
    }))
}
