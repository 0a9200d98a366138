//! Request context carrying the caller's identity and role.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use resort_core::error::AppError;
use resort_core::types::id::UserId;

/// Role asserted by the upstream identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    /// A hotel guest.
    Guest,
    /// Front desk or spa staff.
    Staff,
    /// Platform administrator.
    Admin,
}

impl fmt::Display for CallerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => write!(f, "guest"),
            Self::Staff => write!(f, "staff"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for CallerRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::authentication(format!("Unknown role '{other}'"))),
        }
    }
}

/// Context for the current request.
///
/// Built by the API layer from trusted upstream headers and passed into
/// every service method that acts on behalf of someone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller.
    pub user_id: UserId,
    /// The caller's role.
    pub role: CallerRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: CallerRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Whether the caller may use operator functions.
    pub fn is_staff(&self) -> bool {
        matches!(self.role, CallerRole::Staff | CallerRole::Admin)
    }

    /// Fail with `Authorization` unless the caller is staff or admin.
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::forbidden("Operator access required"))
        }
    }

    /// Whether the caller owns `user_id`'s data or is staff.
    pub fn can_act_for(&self, user_id: UserId) -> bool {
        self.user_id == user_id || self.is_staff()
    }
}
