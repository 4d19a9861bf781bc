use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Body extractor that accepts either `application/json` or
/// `application/x-www-form-urlencoded`. Rejections become 400s.
pub struct JsonOrForm<T>(pub T);

impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if has_content_type(req.headers(), "application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::validation(e.body_text()))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        Ok(Self(value))
    }
}

pub(crate) fn has_content_type(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with(expected))
}

/// Treat absent and empty fields the same way.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
