use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id, issued by the external auth service.
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Renter,
    Owner,
}

/// Per-request authorization capability, resolved once from the verified
/// token. Handlers never consult mutable user records for identity.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the bearer token
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Authentication("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Authentication("Malformed Authorization header".to_string()))?;

    // 2. Verify the signature and decode claims
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| ApiError::Authentication(format!("Invalid token: {}", e)))?;

    // 3. Resolve the capability
    let id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| ApiError::Authentication("Invalid subject claim".to_string()))?;
    let role = match token_data.claims.role.as_str() {
        "renter" => Role::Renter,
        "owner" => Role::Owner,
        other => {
            return Err(ApiError::Authentication(format!(
                "Unknown role `{}`",
                other
            )))
        }
    };

    req.extensions_mut().insert(CurrentUser { id, role });

    Ok(next.run(req).await)
}
