/// Authentication handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    metrics,
    models::{LoginRequest, RegisterRequest},
    services::AuthenticatedUser,
    AppState,
};

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response with the bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Register endpoint handler
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .credentials
        .create(&payload.username, &payload.password)
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse::new("User registered successfully")))
}

/// Login endpoint handler
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .credentials
        .verify(&payload.username, &payload.password)
        .await?;

    let access_token = state.tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.ttl().num_seconds(),
    }))
}

/// Logout endpoint handler
///
/// Only reachable behind `JwtAuthMiddleware`, so the token already passed
/// validation in this request.
pub async fn logout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let id = state.tokens.extract_identifier(&user);
    state.revocations.revoke(&id.jti, id.expires_at).await?;

    metrics::record_revocation();
    tracing::info!(user_id = user.user_id(), jti = %id.jti, "Access token revoked");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Access token revoked")))
}
