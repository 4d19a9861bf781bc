use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use civic_types::models::{Role, Session};

use crate::AppState;
use crate::error::ApiError;

/// Only citizen sessions pass. Inserts the [`Session`] into request extensions.
pub async fn require_citizen(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&state, Role::Citizen, req, next).await
}

/// Only authority sessions pass. Inserts the [`Session`] into request extensions.
pub async fn require_authority(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&state, Role::Authority, req, next).await
}

async fn require_role(
    state: &AppState,
    role: Role,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = authenticate(state, role, &req)?;
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// Resolve the bearer token on `req` to a session of the given role.
fn authenticate(state: &AppState, role: Role, req: &Request) -> Result<Session, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("missing token"))?;

    state
        .sessions
        .lookup(token)
        .filter(|session| session.role == role)
        .ok_or_else(|| ApiError::unauthorized("invalid token"))
}
