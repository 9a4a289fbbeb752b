//! Bearer-token authentication middleware
//!
//! Verifies signature and expiry once at the boundary and fails closed;
//! downstream code receives the decoded [`AuthUser`] explicitly and never
//! reads ambient token state.

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::ApiError, models::Role, state::AppState};

/// Identity decoded from a verified session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Guard for admin-only operations.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Guard for operations on a resource owned by `owner_email`.
    pub fn require_owner_or_admin(&self, owner_email: &str) -> Result<(), ApiError> {
        if self.role.is_admin() || self.email == owner_email {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let claims = state
        .jwt
        .validate(token)
        .map_err(|_| ApiError::Unauthenticated)?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn admin_guard() {
        assert!(auth(Role::Admin).require_admin().is_ok());
        assert!(matches!(
            auth(Role::Customer).require_admin(),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn ownership_guard_accepts_owner_and_admin() {
        assert!(auth(Role::Customer).require_owner_or_admin("a@x.com").is_ok());
        assert!(auth(Role::Admin).require_owner_or_admin("b@x.com").is_ok());
        assert!(matches!(
            auth(Role::Customer).require_owner_or_admin("b@x.com"),
            Err(ApiError::Forbidden)
        ));
    }
}
