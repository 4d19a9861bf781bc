use crate::Database;
use crate::models::{AuthorityRow, CitizenRow, NewReport, ReportRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Citizens --

    pub fn find_citizen_by_aadhaar(&self, aadhaar: &str) -> Result<Option<CitizenRow>> {
        self.with_conn(|conn| query_citizen_by_aadhaar(conn, aadhaar))
    }

    /// Look up a citizen by aadhaar, inserting a new row if none exists.
    /// Returns the row and whether it was just created. Both steps run
    /// under one lock acquisition so concurrent first logins share a row.
    pub fn find_or_create_citizen(&self, aadhaar: &str) -> Result<(CitizenRow, bool)> {
        self.with_conn(|conn| {
            if let Some(existing) = query_citizen_by_aadhaar(conn, aadhaar)? {
                return Ok((existing, false));
            }

            conn.execute("INSERT INTO citizens (aadhaar) VALUES (?1)", [aadhaar])?;

            Ok((
                CitizenRow {
                    id: conn.last_insert_rowid(),
                    aadhaar: aadhaar.to_string(),
                    name: None,
                },
                true,
            ))
        })
    }

    // -- Authorities --

    pub fn find_authority_by_email(&self, email: &str) -> Result<Option<AuthorityRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, email, password FROM authorities WHERE email = ?1",
                [email],
                |row| {
                    Ok(AuthorityRow {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password: row.get(2)?,
                    })
                },
            )
            .optional()
        })
    }

    /// Insert the authority account unless one with this email already
    /// exists. An existing row keeps its password. Returns true if inserted.
    pub fn seed_authority(&self, email: &str, password: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO authorities (email, password) VALUES (?1, ?2)",
                (email, password),
            )?;
            Ok(inserted > 0)
        })
    }

    // -- Reports --

    /// Anonymity flags are always written as 0.
    pub fn insert_report(&self, report: &NewReport<'_>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO reports
                    (citizen_id, priority, description, location, phone, ward, photos,
                     anonymous_public, anonymous_authority)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 0)",
                rusqlite::params![
                    report.citizen_id,
                    report.priority,
                    report.description,
                    report.location,
                    report.phone,
                    report.ward,
                    report.photos_json,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_reports(&self) -> Result<Vec<ReportRow>> {
        self.with_conn(query_reports)
    }
}

fn query_citizen_by_aadhaar(conn: &Connection, aadhaar: &str) -> Result<Option<CitizenRow>> {
    let mut stmt = conn.prepare("SELECT id, aadhaar, name FROM citizens WHERE aadhaar = ?1")?;

    let row = stmt
        .query_row([aadhaar], |row| {
            Ok(CitizenRow {
                id: row.get(0)?,
                aadhaar: row.get(1)?,
                name: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_reports(conn: &Connection) -> Result<Vec<ReportRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, citizen_id, priority, description, location, phone, ward, photos,
                anonymous_public, anonymous_authority, status, created_at
         FROM reports
         ORDER BY id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ReportRow {
                id: row.get(0)?,
                citizen_id: row.get(1)?,
                priority: row.get(2)?,
                description: row.get(3)?,
                location: row.get(4)?,
                phone: row.get(5)?,
                ward: row.get(6)?,
                photos: row.get(7)?,
                anonymous_public: row.get(8)?,
                anonymous_authority: row.get(9)?,
                status: row.get(10)?,
                created_at: row.get(11)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report<'a>(citizen_id: i64, description: &'a str) -> NewReport<'a> {
        NewReport {
            citizen_id,
            priority: "medium",
            description,
            location: "Main St",
            phone: "",
            ward: "",
            photos_json: "[]",
        }
    }

    #[test]
    fn find_or_create_citizen_reuses_existing_row() {
        let db = Database::open_in_memory().unwrap();

        let (first, created) = db.find_or_create_citizen("1234").unwrap();
        assert!(created);
        assert_eq!(first.aadhaar, "1234");
        assert!(first.name.is_none());

        let (second, created) = db.find_or_create_citizen("1234").unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM citizens WHERE aadhaar = ?1",
                    ["1234"],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn find_citizen_by_aadhaar_missing_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.find_citizen_by_aadhaar("9999").unwrap().is_none());

        db.find_or_create_citizen("9999").unwrap();
        assert!(db.find_citizen_by_aadhaar("9999").unwrap().is_some());
    }

    #[test]
    fn seed_authority_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        assert!(db.seed_authority("admin@example.gov", "password").unwrap());
        assert!(!db.seed_authority("admin@example.gov", "other").unwrap());

        let authority = db.find_authority_by_email("admin@example.gov").unwrap().unwrap();
        assert_eq!(authority.password, "password");
        assert!(db.find_authority_by_email("nobody@example.gov").unwrap().is_none());
    }

    #[test]
    fn insert_report_applies_defaults() {
        let db = Database::open_in_memory().unwrap();
        let (citizen, _) = db.find_or_create_citizen("1234").unwrap();

        let id = db.insert_report(&report(citizen.id, "pothole")).unwrap();
        let rows = db.list_reports().unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.id, id);
        assert_eq!(row.citizen_id, citizen.id);
        assert_eq!(row.status, "open");
        assert_eq!(row.anonymous_public, 0);
        assert_eq!(row.anonymous_authority, 0);
        assert_eq!(row.photos.as_deref(), Some("[]"));
        assert!(!row.created_at.is_empty());
    }

    #[test]
    fn insert_report_requires_existing_citizen() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_report(&report(42, "orphan")).is_err());
    }

    #[test]
    fn list_reports_in_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        let (citizen, _) = db.find_or_create_citizen("1234").unwrap();

        db.insert_report(&report(citizen.id, "first")).unwrap();
        db.insert_report(&report(citizen.id, "second")).unwrap();

        let descriptions: Vec<String> =
            db.list_reports().unwrap().into_iter().map(|r| r.description).collect();
        assert_eq!(descriptions, vec!["first", "second"]);
    }
}
