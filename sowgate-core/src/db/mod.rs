//! SQLite persistence for Sowgate.
//!
//! `Database` is the single handle all interfaces use; method
//! implementations are organized by domain (`sows`, `approvals` here, the
//! workflow transitions in [`crate::workflow`]). Every workflow transition
//! runs inside one rusqlite transaction so the SOW status and its approval
//! rows can never diverge on a partial failure.

mod approvals;
mod schema;
mod sows;

pub(crate) use approvals::{insert_step_if_absent, mark_step, upsert_step_pending};
pub(crate) use sows::sow_for_update;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Role, SignatureAuthorityLimit, User, Vendor};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create a database at the given path. Call [`migrate`]
    /// before first use.
    ///
    /// [`migrate`]: Database::migrate
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        info!(path = %path.display(), "database opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("dev", "sowgate", "sowgate")
            .ok_or(Error::NoDataDir)?;
        Self::open(dirs.data_dir().join("sowgate.db"))
    }

    /// Fresh in-memory database with the schema applied. Test use.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn migrate(&self) -> Result<()> {
        self.lock().execute_batch(schema::SCHEMA)?;
        info!("database schema up to date");
        Ok(())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }
}

// Users, vendors and signature authority limits. Seed/admin surface; the
// workflow engine only reads from these.
impl Database {
    /// Create or update a user keyed by email. Returns the stored row.
    pub fn upsert_user(&self, name: &str, email: &str, role: Role) -> Result<User> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO users (id, name, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(email) DO UPDATE SET name = excluded.name, role = excluded.role",
            params![
                Uuid::new_v4().to_string(),
                name,
                email,
                role.as_str(),
                Utc::now().to_rfc3339()
            ],
        )?;
        let user = conn.query_row(
            "SELECT id, name, email, role FROM users WHERE email = ?1",
            [email],
            user_from_row,
        )?;
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .lock()
            .query_row(
                "SELECT id, name, email, role FROM users WHERE id = ?1",
                [id.to_string()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .lock()
            .query_row(
                "SELECT id, name, email, role FROM users WHERE email = ?1",
                [email],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Create or update a vendor keyed by its code.
    pub fn upsert_vendor(&self, name: &str, code: &str, email: Option<&str>) -> Result<Vendor> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO vendors (id, name, code, email, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(code) DO UPDATE SET name = excluded.name, email = excluded.email",
            params![
                Uuid::new_v4().to_string(),
                name,
                code,
                email,
                Utc::now().to_rfc3339()
            ],
        )?;
        let vendor = conn.query_row(
            "SELECT id, name, code, email FROM vendors WHERE code = ?1",
            [code],
            vendor_from_row,
        )?;
        Ok(vendor)
    }

    pub fn get_vendor_by_code(&self, code: &str) -> Result<Option<Vendor>> {
        let vendor = self
            .lock()
            .query_row(
                "SELECT id, name, code, email FROM vendors WHERE code = ?1",
                [code],
                vendor_from_row,
            )
            .optional()?;
        Ok(vendor)
    }

    /// Set a user's signature authority limit (one row per user).
    pub fn upsert_signature_limit(&self, user_id: Uuid, limit_amount_cents: i64) -> Result<()> {
        self.lock().execute(
            "INSERT INTO signature_authority_limits (user_id, limit_amount_cents, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET limit_amount_cents = excluded.limit_amount_cents",
            params![user_id.to_string(), limit_amount_cents, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_signature_limit(&self, user_id: Uuid) -> Result<Option<SignatureAuthorityLimit>> {
        let limit = signature_limit(&self.lock(), user_id)?;
        Ok(limit.map(|limit_amount_cents| SignatureAuthorityLimit {
            user_id,
            limit_amount_cents,
        }))
    }
}

/// Limit lookup usable both standalone and inside a transition's
/// transaction (a `Transaction` derefs to `Connection`).
pub(crate) fn signature_limit(conn: &Connection, user_id: Uuid) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT limit_amount_cents FROM signature_authority_limits WHERE user_id = ?1",
        [user_id.to_string()],
        |row| row.get(0),
    )
    .optional()
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: read_uuid(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: read_enum(row, 3, Role::from_str)?,
    })
}

fn vendor_from_row(row: &Row) -> rusqlite::Result<Vendor> {
    Ok(Vendor {
        id: read_uuid(row, 0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        email: row.get(3)?,
    })
}

// Column readers for the TEXT encodings used throughout the schema
// (UUID strings, RFC 3339 timestamps, enum tags).

pub(crate) fn read_uuid(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn read_uuid_opt(row: &Row, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        Uuid::parse_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

pub(crate) fn read_ts(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn read_ts_opt(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

pub(crate) fn read_date_opt(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        s.parse::<NaiveDate>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

pub(crate) fn read_enum<T>(
    row: &Row,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    parse(&s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unrecognized value: {s}").into(),
        )
    })
}

pub(crate) fn read_enum_opt<T>(
    row: &Row,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<Option<T>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        parse(&s).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                format!("unrecognized value: {s}").into(),
            )
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("sowgate.db");

        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn upsert_user_is_keyed_by_email() {
        let db = Database::open_in_memory().unwrap();

        let first = db.upsert_user("Alex", "hm@vms.local", Role::HiringManager).unwrap();
        let second = db.upsert_user("Alexandra", "hm@vms.local", Role::HiringManager).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Alexandra");
        assert_eq!(db.get_user(first.id).unwrap().unwrap().email, "hm@vms.local");
    }

    #[test]
    fn signature_limit_upsert_keeps_one_row_per_user() {
        let db = Database::open_in_memory().unwrap();
        let user = db.upsert_user("Jordan", "approver@vms.local", Role::Approver).unwrap();

        db.upsert_signature_limit(user.id, 50_000_00).unwrap();
        db.upsert_signature_limit(user.id, 75_000_00).unwrap();

        let limit = db.get_signature_limit(user.id).unwrap().unwrap();
        assert_eq!(limit.user_id, user.id);
        assert_eq!(limit.limit_amount_cents, 75_000_00);
    }

    #[test]
    fn vendors_are_looked_up_by_code() {
        let db = Database::open_in_memory().unwrap();
        let created = db
            .upsert_vendor("Acme Staffing Inc.", "SUP-001", None)
            .unwrap();

        let found = db.get_vendor_by_code("SUP-001").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Acme Staffing Inc.");
        assert!(db.get_vendor_by_code("SUP-999").unwrap().is_none());
    }
}
