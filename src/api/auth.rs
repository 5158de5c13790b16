use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::state::AppState;
use crate::core::permissions::{authorize, Action};
use crate::domain::model::{User, UserId};
use crate::utils::error::{FoodgramError, Result};

const TOKEN_PREFIX: &str = "Token ";

/// The user behind `Authorization: Token <key>`, or `None` for anonymous requests.
pub struct Caller(pub Option<User>);

impl Caller {
    /// Checks the permission table and returns the authenticated user.
    pub fn require(self, action: Action) -> Result<User> {
        authorize(action, self.0.as_ref())?;
        self.0.ok_or(FoodgramError::Unauthenticated)
    }

    pub fn allow(&self, action: Action) -> Result<()> {
        authorize(action, self.0.as_ref()).map(|_| ())
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|user| user.id)
    }
}

fn parse_token(value: &str) -> Option<&str> {
    value
        .strip_prefix(TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = FoodgramError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(parse_token)
            .ok_or(FoodgramError::Unauthenticated)?;

        let user = state
            .store
            .user_by_token(token)
            .await?
            .ok_or(FoodgramError::Unauthenticated)?;

        Ok(Caller(Some(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token("Token abc123"), Some("abc123"));
        assert_eq!(parse_token("Token   abc123 "), Some("abc123"));
        assert_eq!(parse_token("Bearer abc123"), None);
        assert_eq!(parse_token("Token "), None);
    }
}
