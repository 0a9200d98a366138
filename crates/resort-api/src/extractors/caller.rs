//! `Caller` extractor: reads the identity asserted by the upstream gateway.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use resort_core::error::AppError;
use resort_core::types::id::UserId;
use resort_service::context::{CallerRole, RequestContext};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's user id (UUID).
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role (`guest`, `staff` or `admin`).
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Identified caller available in handlers.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl Caller {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for Caller {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)?
            .parse::<UserId>()
            .map_err(|_| AppError::authentication("Invalid x-user-id header"))?;

        // A missing role means an ordinary guest.
        let role = match parts.headers.get(USER_ROLE_HEADER) {
            Some(_) => header(parts, USER_ROLE_HEADER)?.parse::<CallerRole>()?,
            None => CallerRole::Guest,
        };

        Ok(Caller(RequestContext::new(user_id, role)))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::authentication(format!("Missing {name} header")))?
        .to_str()
        .map_err(|_| AppError::authentication(format!("Malformed {name} header")))
}
