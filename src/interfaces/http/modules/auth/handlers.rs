//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::application::IdentityService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, CreatedResult, ValidatedJson};

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub identity: Arc<IdentityService>,
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let auth = state
        .identity
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(ApiResponse::success(auth.into())))
}

/// `POST /api/v1/auth/register`
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> CreatedResult<UserInfo> {
    let user = state
        .identity
        .register(&request.username, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}
