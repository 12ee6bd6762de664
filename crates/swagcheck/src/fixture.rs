//! Fixture data: test users and expected login messages.
//!
//! Defaults are embedded from `fixtures/*.json`. A directory holding
//! `users.json` and `messages.json` in the same shape can replace them.

use crate::result::{PageError, PageResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

const USERS_JSON: &str = include_str!("../fixtures/users.json");
const MESSAGES_JSON: &str = include_str!("../fixtures/messages.json");

/// Test accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Users {
    /// Account that logs in normally
    #[serde(rename = "USER_001")]
    pub standard: String,
    /// Account that is locked out
    #[serde(rename = "USER_002")]
    pub locked_out: String,
    /// Password shared by every account
    #[serde(rename = "PASSWORD_COMMON")]
    pub password: String,
}

/// Login error messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    /// Empty username
    #[serde(rename = "LOGIN_ERROR_MSG_001")]
    pub username_required: String,
    /// Empty password
    #[serde(rename = "LOGIN_ERROR_MSG_002")]
    pub password_required: String,
    /// Unknown user or wrong password
    #[serde(rename = "LOGIN_ERROR_MSG_003")]
    pub credentials_mismatch: String,
    /// Locked account
    #[serde(rename = "LOGIN_ERROR_MSG_004")]
    pub locked_out: String,
}

/// All fixture data for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixtures {
    /// Accounts
    pub users: Users,
    /// Messages
    pub messages: Messages,
}

impl Fixtures {
    /// Fixtures compiled into the crate
    ///
    /// # Errors
    ///
    /// `Fixture` if the embedded JSON does not parse.
    pub fn embedded() -> PageResult<Self> {
        Ok(Self {
            users: parse("users.json", USERS_JSON)?,
            messages: parse("messages.json", MESSAGES_JSON)?,
        })
    }

    /// Load `users.json` and `messages.json` from `dir`
    ///
    /// # Errors
    ///
    /// `Fixture` if a file is missing or malformed.
    pub fn load_dir(dir: impl AsRef<Path>) -> PageResult<Self> {
        let dir = dir.as_ref();
        tracing::debug!(dir = %dir.display(), "loading fixtures");
        Ok(Self {
            users: read(&dir.join("users.json"))?,
            messages: read(&dir.join("messages.json"))?,
        })
    }
}

fn read<T: for<'de> Deserialize<'de>>(path: &Path) -> PageResult<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| PageError::Fixture {
        message: format!("{}: {e}", path.display()),
    })?;
    parse(&path.display().to_string(), &raw)
}

fn parse<T: for<'de> Deserialize<'de>>(source: &str, raw: &str) -> PageResult<T> {
    serde_json::from_str(raw).map_err(|e| PageError::Fixture {
        message: format!("{source}: {e}"),
    })
}
