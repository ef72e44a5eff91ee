//! User repository

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::error::{BankError, BankResult};
use crate::models::{NewUser, User, UserId};

const USER_COLUMNS: &str = "id, first_name, last_name, username, age, password";

/// Repository for user persistence
pub struct UserRepository<'c> {
    conn: &'c Connection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a new user
    ///
    /// A taken username surfaces as `BankError::Duplicate`.
    pub fn insert(&self, user: &NewUser) -> BankResult<User> {
        let result = self.conn.execute(
            "INSERT INTO users (first_name, last_name, username, age, password)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.first_name,
                user.last_name,
                user.username,
                user.age,
                user.password_hash
            ],
        );

        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(BankError::duplicate_username(&user.username));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(User {
            id: UserId::new(self.conn.last_insert_rowid()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            age: user.age,
            password_hash: user.password_hash.clone(),
        })
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> BankResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                [id],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by exact username
    pub fn get_by_username(&self, username: &str) -> BankResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                [username],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Count users
    pub fn count(&self) -> BankResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        username: row.get(3)?,
        age: row.get(4)?,
        password_hash: row.get(5)?,
    })
}
