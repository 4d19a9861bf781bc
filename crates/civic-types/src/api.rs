use serde::{Deserialize, Serialize};

// -- Errors --

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Auth --

/// Fields are optional so that a missing field is reported as a 400 with a
/// message rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CitizenLoginRequest {
    pub aadhaar: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitizenUser {
    pub id: i64,
    pub aadhaar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitizenLoginResponse {
    pub token: String,
    pub user: CitizenUser,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorityLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityUser {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityLoginResponse {
    pub token: String,
    pub user: AuthorityUser,
}

// -- Reports --

/// Text fields of a report submission. Unknown fields (including any
/// anonymity flags a client sends) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ReportFields {
    pub description: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub ward: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub id: i64,
    pub citizen_id: i64,
    pub priority: String,
    pub description: String,
    pub location: String,
    pub phone: String,
    pub ward: String,
    pub photos: Vec<String>,
    pub anonymous_public: i64,
    pub anonymous_authority: i64,
    pub status: String,
    pub created_at: String,
}
