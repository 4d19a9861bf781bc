use axum::{Json, extract::State};
use tracing::{debug, info};

use civic_types::api::{
    AuthorityLoginRequest, AuthorityLoginResponse, AuthorityUser, CitizenLoginRequest,
    CitizenLoginResponse, CitizenUser,
};
use civic_types::models::Role;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::{JsonOrForm, non_empty};

/// The only one-time code accepted for citizen login. There is no SMS
/// gateway behind it.
pub const ACCEPTED_OTP: &str = "123456";

/// POST /api/auth/citizen — OTP login; creates the citizen on first use.
pub async fn citizen_login(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<CitizenLoginRequest>,
) -> Result<Json<CitizenLoginResponse>, ApiError> {
    let (Some(aadhaar), Some(otp)) = (non_empty(req.aadhaar), non_empty(req.otp)) else {
        return Err(ApiError::validation("aadhaar and otp required"));
    };

    if otp != ACCEPTED_OTP {
        debug!("Rejected citizen login: wrong OTP");
        return Err(ApiError::unauthorized("invalid OTP"));
    }

    let db = state.clone();
    let (citizen, created) =
        tokio::task::spawn_blocking(move || db.db.find_or_create_citizen(&aadhaar)).await??;

    if created {
        info!("Registered citizen {}", citizen.id);
    }

    let token = state.sessions.create(Role::Citizen, citizen.id);
    info!("Citizen {} logged in", citizen.id);

    Ok(Json(CitizenLoginResponse {
        token,
        user: CitizenUser {
            id: citizen.id,
            aadhaar: citizen.aadhaar,
        },
    }))
}

/// POST /api/auth/authority — email/password login against the seeded accounts.
pub async fn authority_login(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<AuthorityLoginRequest>,
) -> Result<Json<AuthorityLoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (non_empty(req.email), non_empty(req.password)) else {
        return Err(ApiError::validation("email and password required"));
    };

    let db = state.clone();
    let authority = tokio::task::spawn_blocking(move || db.db.find_authority_by_email(&email))
        .await??
        // Passwords are stored and compared as plaintext.
        .filter(|row| row.password == password)
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    let token = state.sessions.create(Role::Authority, authority.id);
    info!("Authority {} logged in", authority.id);

    Ok(Json(AuthorityLoginResponse {
        token,
        user: AuthorityUser {
            id: authority.id,
            email: authority.email,
        },
    }))
}
