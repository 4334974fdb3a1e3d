//! User accounts and roles.
//!
//! Credentials are stored and compared in plaintext. Accounts live only in
//! process memory.

use crate::primitives::ROOT_USERNAME;
use crate::types::{GradebookError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access including account management.
    Superuser,
    /// Manages courses, units and students.
    Admin,
    /// Enters and locks grades.
    Teacher,
}

impl UserRole {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            UserRole::Superuser => "Superuser",
            UserRole::Admin => "Admin",
            UserRole::Teacher => "Teacher",
        }
    }

    /// Whether the role may change course structure and unlock grades.
    #[must_use]
    pub fn is_editor(&self) -> bool {
        matches!(self, UserRole::Superuser | UserRole::Admin)
    }

    /// Whether the role may create, edit and delete accounts.
    #[must_use]
    pub fn manages_users(&self) -> bool {
        matches!(self, UserRole::Superuser)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UserRole {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "superuser" => Ok(UserRole::Superuser),
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            _ => Err(GradebookError::InvalidInput(format!("unknown role '{s}'"))),
        }
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Never serialized out.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: UserRole,
}

impl User {
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    /// Whether this is the undeletable root account.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.username == ROOT_USERNAME
    }

    /// The seeded accounts.
    #[must_use]
    pub fn defaults() -> Vec<User> {
        vec![
            User::new(
                UserId::from("root-admin"),
                ROOT_USERNAME,
                ROOT_USERNAME,
                UserRole::Superuser,
            ),
            User::new(
                UserId::from("default-teacher"),
                "teacher",
                "password",
                UserRole::Teacher,
            ),
            User::new(
                UserId::from("default-admin"),
                "admin",
                "password",
                UserRole::Admin,
            ),
        ]
    }
}

/// Fields for creating or replacing an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

impl UserDraft {
    pub(crate) fn validate(&self) -> Result<(), GradebookError> {
        if self.username.trim().is_empty() {
            return Err(GradebookError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(GradebookError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
