//! Row structs for the three tables. The HTTP layer converts these into
//! civic-types responses; nothing here is serialized directly.

pub struct CitizenRow {
    pub id: i64,
    pub aadhaar: String,
    pub name: Option<String>,
}

pub struct AuthorityRow {
    pub id: i64,
    pub email: String,
    pub password: String,
}

/// Values for a report insert. Status, anonymity flags and the timestamp
/// are not caller-controlled.
pub struct NewReport<'a> {
    pub citizen_id: i64,
    pub priority: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub phone: &'a str,
    pub ward: &'a str,
    pub photos_json: &'a str,
}

pub struct ReportRow {
    pub id: i64,
    pub citizen_id: i64,
    pub priority: String,
    pub description: String,
    pub location: String,
    pub phone: String,
    pub ward: String,
    /// Raw JSON text as stored; may be NULL or malformed in old rows.
    pub photos: Option<String>,
    pub anonymous_public: i64,
    pub anonymous_authority: i64,
    pub status: String,
    pub created_at: String,
}
