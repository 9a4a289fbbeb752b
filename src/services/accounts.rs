//! Account registration and login, including the lockout policy

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    jwt::JwtService,
    models::{Role, User},
    password,
    store::{StoreError, UserRepository},
    validation,
};

/// Consecutive failed logins before an account is locked.
pub const MAX_FAILED_LOGINS: u32 = 5;
/// How long a lockout suppresses logins.
pub const LOCKOUT_MINUTES: i64 = 10;

/// Session issued by a successful login
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub token: String,
    pub role: Role,
}

/// Account service
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    jwt: JwtService,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Register a new account. The first registrant ever administers the
    /// shop (demo rule).
    pub async fn register(&self, email: &str, plain_password: &str) -> ApiResult<User> {
        validation::validate_email(email).map_err(ApiError::InvalidInput)?;
        validation::validate_password(plain_password).map_err(ApiError::InvalidInput)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(ApiError::DuplicateIdentity);
        }

        let role = if self.users.count().await? == 0 {
            Role::Admin
        } else {
            Role::Customer
        };

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password::hash(plain_password)
                .map_err(|e| ApiError::Internal(e.to_string()))?,
            role,
            // Demo default: accounts start verified.
            verified: true,
            failed_logins: 0,
            locked_until: None,
            created_at: Utc::now(),
        };

        self.users.create(user.clone()).await.map_err(|e| match e {
            StoreError::DuplicateKey(_) => ApiError::DuplicateIdentity,
            other => ApiError::from(other),
        })?;

        info!(email = %user.email, role = ?user.role, "registered user");
        Ok(user)
    }

    /// Authenticate and issue a session token.
    ///
    /// An active lockout wins over everything, including a correct
    /// password. A wrong password for a known account bumps the failure
    /// counter; the counter reaching `MAX_FAILED_LOGINS` starts the
    /// lockout timer. A successful login resets both.
    pub async fn login(&self, email: &str, plain_password: &str) -> ApiResult<SessionGrant> {
        let Some(mut user) = self.users.find_by_email(email).await? else {
            return Err(ApiError::InvalidCredentials);
        };

        let now = Utc::now();
        if user.locked_at(now) {
            warn!(email = %user.email, "login attempt on locked account");
            return Err(ApiError::AccountLocked);
        }

        if !password::verify(plain_password, &user.password_hash) {
            user.failed_logins += 1;
            let locked = user.failed_logins >= MAX_FAILED_LOGINS;
            if locked {
                user.locked_until = Some(now + Duration::minutes(LOCKOUT_MINUTES));
                warn!(email = %user.email, "account locked after repeated failures");
            }
            self.users.update(&user).await?;
            return Err(if locked {
                ApiError::AccountLocked
            } else {
                ApiError::InvalidCredentials
            });
        }

        if !user.verified {
            return Err(ApiError::NotVerified);
        }

        if user.failed_logins != 0 || user.locked_until.is_some() {
            user.failed_logins = 0;
            user.locked_until = None;
            self.users.update(&user).await?;
        }

        let token = self
            .jwt
            .issue(&user)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        info!(email = %user.email, "login succeeded");
        Ok(SessionGrant {
            token,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtConfig;
    use crate::store::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> AccountService {
        let jwt = JwtService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            session_ttl: 3600,
        });
        AccountService::new(store.clone(), jwt)
    }

    #[tokio::test]
    async fn first_registrant_becomes_admin() {
        let store = Arc::new(MemoryStore::new());
        let accounts = service(&store);

        let first = accounts.register("a@x.com", "password123").await.unwrap();
        let second = accounts.register("b@x.com", "password123").await.unwrap();

        assert_eq!(first.role, Role::Admin);
        assert_eq!(second.role, Role::Customer);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = Arc::new(MemoryStore::new());
        let accounts = service(&store);

        accounts.register("a@x.com", "password123").await.unwrap();
        let err = accounts
            .register("a@x.com", "otherpassword")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn rejects_bad_email_and_short_password() {
        let store = Arc::new(MemoryStore::new());
        let accounts = service(&store);

        assert!(matches!(
            accounts.register("not-an-email", "password123").await,
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            accounts.register("a@x.com", "short").await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn login_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let accounts = service(&store);

        accounts.register("a@x.com", "password123").await.unwrap();
        let grant = accounts.login("a@x.com", "password123").await.unwrap();
        assert_eq!(grant.role, Role::Admin);
        assert!(!grant.token.is_empty());

        assert!(matches!(
            accounts.login("a@x.com", "wrongpassword").await,
            Err(ApiError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.login("nobody@x.com", "password123").await,
            Err(ApiError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn fifth_failure_locks_the_account() {
        let store = Arc::new(MemoryStore::new());
        let accounts = service(&store);
        accounts.register("a@x.com", "password123").await.unwrap();

        for _ in 0..4 {
            let err = accounts.login("a@x.com", "wrongpassword").await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidCredentials));
        }
        let err = accounts.login("a@x.com", "wrongpassword").await.unwrap_err();
        assert!(matches!(err, ApiError::AccountLocked));

        // Even the correct password is refused while the lockout runs.
        let err = accounts.login("a@x.com", "password123").await.unwrap_err();
        assert!(matches!(err, ApiError::AccountLocked));
    }

    #[tokio::test]
    async fn expired_lockout_allows_login_and_resets_counter() {
        let store = Arc::new(MemoryStore::new());
        let accounts = service(&store);
        accounts.register("a@x.com", "password123").await.unwrap();

        for _ in 0..5 {
            let _ = accounts.login("a@x.com", "wrongpassword").await;
        }

        // Rewind the lockout expiry instead of waiting ten minutes.
        let mut user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        user.locked_until = Some(Utc::now() - Duration::seconds(1));
        store.update(&user).await.unwrap();

        accounts.login("a@x.com", "password123").await.unwrap();

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.failed_logins, 0);
        assert!(user.locked_until.is_none());
    }

    #[tokio::test]
    async fn unverified_account_cannot_log_in() {
        let store = Arc::new(MemoryStore::new());
        let accounts = service(&store);
        accounts.register("a@x.com", "password123").await.unwrap();

        let mut user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        user.verified = false;
        store.update(&user).await.unwrap();

        let err = accounts.login("a@x.com", "password123").await.unwrap_err();
        assert!(matches!(err, ApiError::NotVerified));
    }
}
