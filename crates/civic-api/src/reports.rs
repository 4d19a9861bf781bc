use axum::{
    Extension, Json,
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
};
use tracing::{info, warn};

use civic_db::models::{NewReport, ReportRow};
use civic_types::api::{CreateReportResponse, ReportFields, ReportResponse};
use civic_types::models::Session;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::{JsonOrForm, has_content_type, non_empty};

/// Upper bound on `photos` parts in one submission.
pub const MAX_PHOTOS: usize = 5;

/// Multipart field name for photo attachments.
const PHOTOS_FIELD: &str = "photos";

const DEFAULT_PRIORITY: &str = "medium";

/// A photo part held in memory until the text fields have been validated.
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Report body from either a multipart form (with photos) or a JSON /
/// urlencoded body (text fields only).
pub struct ReportSubmission {
    pub fields: ReportFields,
    pub photos: Vec<PhotoUpload>,
}

impl<S> FromRequest<S> for ReportSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_content_type(req.headers(), "multipart/form-data") {
            let JsonOrForm(fields) = JsonOrForm::<ReportFields>::from_request(req, state).await?;
            return Ok(Self {
                fields,
                photos: Vec::new(),
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        read_multipart(multipart).await
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ReportSubmission, ApiError> {
    let mut fields = ReportFields::default();
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            if name != PHOTOS_FIELD {
                return Err(ApiError::validation(format!("unexpected file field: {}", name)));
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(e.body_text()))?;

            // Browsers send an empty part for a file input left blank.
            if file_name.is_empty() && data.is_empty() {
                continue;
            }

            if photos.len() == MAX_PHOTOS {
                return Err(ApiError::validation(format!(
                    "too many photos (max {})",
                    MAX_PHOTOS
                )));
            }

            photos.push(PhotoUpload {
                file_name: Some(file_name),
                data,
            });
            continue;
        }

        let slot = match name.as_str() {
            "description" => &mut fields.description,
            "location" => &mut fields.location,
            "phone" => &mut fields.phone,
            "ward" => &mut fields.ward,
            "priority" => &mut fields.priority,
            _ => continue,
        };
        *slot = Some(
            field
                .text()
                .await
                .map_err(|e| ApiError::validation(e.body_text()))?,
        );
    }

    Ok(ReportSubmission { fields, photos })
}

/// POST /api/reports — file a report as the logged-in citizen.
pub async fn create_report(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    submission: ReportSubmission,
) -> Result<Json<CreateReportResponse>, ApiError> {
    let ReportSubmission { fields, photos } = submission;

    let (Some(description), Some(location)) =
        (non_empty(fields.description), non_empty(fields.location))
    else {
        return Err(ApiError::validation("description and location required"));
    };
    let priority = non_empty(fields.priority).unwrap_or_else(|| DEFAULT_PRIORITY.to_string());
    let phone = fields.phone.unwrap_or_default();
    let ward = fields.ward.unwrap_or_default();

    let mut photo_paths = Vec::with_capacity(photos.len());
    for photo in &photos {
        match state.photos.save(photo.file_name.as_deref(), &photo.data).await {
            Ok(path) => photo_paths.push(path),
            Err(e) => {
                state.photos.discard(&photo_paths).await;
                return Err(ApiError::Internal(format!("failed to store photo: {}", e)));
            }
        }
    }

    let photos_json = serde_json::to_string(&photo_paths)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let db = state.clone();
    let citizen_id = session.user_id;
    let inserted = tokio::task::spawn_blocking(move || {
        db.db.insert_report(&NewReport {
            citizen_id,
            priority: &priority,
            description: &description,
            location: &location,
            phone: &phone,
            ward: &ward,
            photos_json: &photos_json,
        })
    })
    .await?;

    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            warn!("Report insert failed for citizen {}: {}", citizen_id, e);
            state.photos.discard(&photo_paths).await;
            return Err(e.into());
        }
    };

    info!(
        "Report {} created by citizen {} with {} photo(s)",
        id,
        citizen_id,
        photo_paths.len()
    );

    Ok(Json(CreateReportResponse { id }))
}

/// GET /api/reports — every report, for authority review.
pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportResponse>>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_reports()).await??;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

fn to_response(row: ReportRow) -> ReportResponse {
    ReportResponse {
        photos: parse_photos(row.photos.as_deref()),
        id: row.id,
        citizen_id: row.citizen_id,
        priority: row.priority,
        description: row.description,
        location: row.location,
        phone: row.phone,
        ward: row.ward,
        anonymous_public: row.anonymous_public,
        anonymous_authority: row.anonymous_authority,
        status: row.status,
        created_at: row.created_at,
    }
}

/// Stored photo list, or empty if the column is NULL or not a JSON array of
/// strings.
pub fn parse_photos(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}
