//! Token checks for HTTP routes.
//!
//! Admin routes need the `api-admin-token` header, user routes the
//! `api-user-token` header, shared routes either one. Each policy is an
//! extractor, so a handler states its policy in its signature:
//!
//! ```rust,ignore
//! async fn delete_monster(_: AdminAccess, ...) -> Result<..., ApiError>
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::api::error::ApiError;
use crate::app::{ApiTokens, App};

pub const ADMIN_TOKEN_HEADER: &str = "api-admin-token";
pub const USER_TOKEN_HEADER: &str = "api-user-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPolicy {
    Admin,
    User,
    Shared,
}

impl TokenPolicy {
    pub fn allows(self, headers: &HeaderMap, tokens: &ApiTokens) -> bool {
        let admin = presented(headers, ADMIN_TOKEN_HEADER, &tokens.admin);
        let user = presented(headers, USER_TOKEN_HEADER, &tokens.user);
        match self {
            TokenPolicy::Admin => admin,
            TokenPolicy::User => user,
            TokenPolicy::Shared => admin || user,
        }
    }
}

fn presented(headers: &HeaderMap, name: &str, expected: &str) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

fn authorize(parts: &Parts, app: &App, policy: TokenPolicy) -> Result<(), ApiError> {
    if policy.allows(&parts.headers, &app.tokens) {
        return Ok(());
    }
    tracing::debug!(policy = ?policy, path = %parts.uri.path(), "Rejected request token");
    Err(ApiError::Unauthorized)
}

/// Request carried the admin token.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

/// Request carried the user token.
#[derive(Debug, Clone, Copy)]
pub struct UserAccess;

/// Request carried either token.
#[derive(Debug, Clone, Copy)]
pub struct SharedAccess;

impl FromRequestParts<Arc<App>> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &Arc<App>) -> Result<Self, Self::Rejection> {
        authorize(parts, app, TokenPolicy::Admin).map(|()| AdminAccess)
    }
}

impl FromRequestParts<Arc<App>> for UserAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &Arc<App>) -> Result<Self, Self::Rejection> {
        authorize(parts, app, TokenPolicy::User).map(|()| UserAccess)
    }
}

impl FromRequestParts<Arc<App>> for SharedAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &Arc<App>) -> Result<Self, Self::Rejection> {
        authorize(parts, app, TokenPolicy::Shared).map(|()| SharedAccess)
    }
}
