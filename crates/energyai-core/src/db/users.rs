//! User account operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Create a user, returning its id
    ///
    /// A duplicate email surfaces as `Error::EmailTaken` so the API layer can
    /// answer 400 instead of a generic server error.
    pub fn create_user(&self, email: &str, password_hash: &str, name: &str) -> Result<i64> {
        let conn = self.conn()?;

        let result = conn.execute(
            "INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)",
            params![email, password_hash, name],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by email (for login)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, password_hash, name, created_at FROM users WHERE email = ?",
                params![email],
                |row| {
                    let created_at_str: String = row.get(4)?;
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                        name: row.get(3)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .ok();

        Ok(user)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, password_hash, name, created_at FROM users WHERE id = ?",
                params![id],
                |row| {
                    let created_at_str: String = row.get(4)?;
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                        name: row.get(3)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .ok();

        Ok(user)
    }

    /// Update a user's name and email
    pub fn update_user_profile(&self, id: i64, name: &str, email: &str) -> Result<()> {
        let conn = self.conn()?;

        let result = conn.execute(
            "UPDATE users SET name = ?, email = ? WHERE id = ?",
            params![name, email, id],
        );

        match result {
            Ok(0) => Err(Error::NotFound(format!("User {}", id))),
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Count registered users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}
