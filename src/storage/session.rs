//! Login session persisted between CLI invocations
//!
//! The session file holds the id of the logged-in user. Sessions created
//! without "remember me" expire after a day.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::MoneyMatePaths;
use crate::error::MoneyMateError;
use crate::models::UserId;

use super::file_io::{read_json, remove_if_exists, write_json_atomic};

const SHORT_SESSION_HOURS: i64 = 24;
const REMEMBERED_SESSION_DAYS: i64 = 30;

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub remember_me: bool,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, remember_me: bool) -> Self {
        Self {
            user_id,
            remember_me,
            logged_in_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        let lifetime = if self.remember_me {
            Duration::days(REMEMBERED_SESSION_DAYS)
        } else {
            Duration::hours(SHORT_SESSION_HOURS)
        };
        self.logged_in_at + lifetime
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Reads and writes `session.json`
pub struct SessionStore {
    paths: MoneyMatePaths,
}

impl SessionStore {
    pub fn new(paths: MoneyMatePaths) -> Self {
        Self { paths }
    }

    /// The current session, if one exists and has not expired
    pub fn load(&self) -> Result<Option<Session>, MoneyMateError> {
        let session: Option<Session> = read_json(self.paths.session_file())?;
        match session {
            Some(s) if s.is_expired_at(Utc::now()) => {
                self.clear()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), MoneyMateError> {
        write_json_atomic(self.paths.session_file(), &Some(session))
    }

    pub fn clear(&self) -> Result<(), MoneyMateError> {
        remove_if_exists(self.paths.session_file())
    }
}
