//! crates/juris_resumo_core/src/auth.rs
//!
//! User registration, login sessions and the admin approval workflow.
//!
//! Users live as one list under the `users` key. A login creates an `AuthSession`
//! keyed by its bearer token that holds a snapshot of the user taken at login time,
//! so approval changes only reach a session on the next login.

use crate::domain::{AuthSession, User, UserCredentials};
use crate::ports::{CredentialHasher, PortError};
use crate::store::{session_key, JsonStore, USERS_KEY};
use chrono::{Duration, Utc};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const SESSION_TTL_DAYS: i64 = 30;

/// Verified against when no account matches, so unknown e-mails cost one hash check too.
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("A user with this e-mail already exists.")]
    DuplicateEmail,
    /// Deliberately identical for unknown e-mails and wrong passwords.
    #[error("Invalid e-mail or password.")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

/// Credentials for the admin account created by `init_admin`.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            email: "admin@admin.com".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// Checks a registration form before anything touches the store.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::Validation("E-mail is required.".to_string()));
    }
    if password != confirm_password {
        return Err(AuthError::Validation("Passwords do not match.".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long."
        )));
    }
    Ok(())
}

pub struct AuthService {
    store: JsonStore,
    hasher: Arc<dyn CredentialHasher>,
    admin: AdminSeed,
    decoy_hash: OnceLock<String>,
}

impl AuthService {
    pub fn new(store: JsonStore, hasher: Arc<dyn CredentialHasher>, admin: AdminSeed) -> Self {
        Self {
            store,
            hasher,
            admin,
            decoy_hash: OnceLock::new(),
        }
    }

    /// For display only; a failed read shows as no users.
    async fn users(&self) -> Vec<UserCredentials> {
        self.store.load(USERS_KEY).await.unwrap_or_default()
    }

    /// The user list to check credentials against or to modify. A failed read is an
    /// error, so a write never replaces every record with an empty list.
    async fn stored_users(&self) -> Result<Vec<UserCredentials>, AuthError> {
        Ok(self.store.try_load(USERS_KEY).await?.unwrap_or_default())
    }

    fn decoy_hash(&self) -> &str {
        self.decoy_hash.get_or_init(|| {
            self.hasher.hash(DECOY_PASSWORD).unwrap_or_else(|e| {
                warn!("Failed to hash the decoy password: {}", e);
                String::new()
            })
        })
    }

    async fn save_users(&self, users: &[UserCredentials]) -> Result<(), PortError> {
        self.store.save(USERS_KEY, users).await
    }

    /// Creates the admin account unless some user already has the admin flag.
    /// Returns whether a record was written.
    pub async fn init_admin(&self) -> Result<bool, AuthError> {
        let mut users = self.stored_users().await?;
        if users.iter().any(|u| u.is_admin) {
            return Ok(false);
        }
        users.push(UserCredentials {
            id: format!("admin-{}", Uuid::new_v4()),
            email: self.admin.email.clone(),
            password_hash: self.hasher.hash(&self.admin.password)?,
            is_approved: true,
            is_admin: true,
        });
        self.save_users(&users).await?;
        info!("Created admin account {}", self.admin.email);
        Ok(true)
    }

    /// Creates an unapproved, non-admin user. Does not log the user in.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut users = self.stored_users().await?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail);
        }
        let record = UserCredentials {
            id: format!("user-{}", Uuid::new_v4()),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            is_approved: false,
            is_admin: false,
        };
        let user = record.to_user();
        users.push(record);
        self.save_users(&users).await?;
        info!("Registered user {} pending approval", user.id);
        Ok(user)
    }

    /// Verifies credentials and opens a session. Approval is not checked here;
    /// it gates what a session may reach, not whether it can exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let users = self.stored_users().await?;
        let record = match users.iter().find(|u| u.email == email) {
            Some(record) if self.hasher.verify(password, &record.password_hash) => record,
            Some(_) => return Err(AuthError::InvalidCredentials),
            None => {
                self.hasher.verify(password, self.decoy_hash());
                return Err(AuthError::InvalidCredentials);
            }
        };

        let now = Utc::now();
        let session = AuthSession {
            token: Uuid::new_v4().to_string(),
            user: record.to_user(),
            created_at: now,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
        };
        self.store.save(&session_key(&session.token), &session).await?;
        debug!("Opened session for user {}", session.user.id);
        Ok(session)
    }

    /// Ends a session. Unknown tokens are ignored and a failed delete is only logged.
    pub async fn logout(&self, token: &str) {
        if let Err(e) = self.store.remove(&session_key(token)).await {
            error!("Failed to delete session record: {}", e);
        }
    }

    /// The user snapshot of a live session. Absent, expired and corrupt sessions
    /// all read as logged out.
    pub async fn current_user(&self, token: &str) -> Option<User> {
        let key = session_key(token);
        let session: AuthSession = self.store.load(&key).await?;
        if session.expires_at <= Utc::now() {
            debug!("Session for user {} expired", session.user.id);
            if let Err(e) = self.store.remove(&key).await {
                warn!("Failed to delete expired session: {}", e);
            }
            return None;
        }
        Some(session.user)
    }

    pub async fn all_users(&self) -> Vec<User> {
        self.users().await.iter().map(UserCredentials::to_user).collect()
    }

    /// Sets the approval flag. Unknown ids are a silent no-op; returns whether a
    /// record was changed.
    pub async fn update_user_approval(
        &self,
        user_id: &str,
        is_approved: bool,
    ) -> Result<bool, AuthError> {
        let mut users = self.stored_users().await?;
        let Some(record) = users.iter_mut().find(|u| u.id == user_id) else {
            debug!("Approval update for unknown user {}", user_id);
            return Ok(false);
        };
        record.is_approved = is_approved;
        self.save_users(&users).await?;
        info!("User {} approval set to {}", user_id, is_approved);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccessLevel;
    use crate::ports::{KeyValueStore, PortResult};
    use crate::store::{FlakyStore, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reversible stand-in so tests don't pay for a real KDF.
    struct TaggingHasher;

    impl CredentialHasher for TaggingHasher {
        fn hash(&self, password: &str) -> PortResult<String> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            hash.strip_prefix("hashed:") == Some(password)
        }
    }

    fn service() -> (Arc<MemoryStore>, AuthService) {
        let memory = Arc::new(MemoryStore::new());
        let service = AuthService::new(
            JsonStore::new(memory.clone()),
            Arc::new(TaggingHasher),
            AdminSeed::default(),
        );
        (memory, service)
    }

    #[tokio::test]
    async fn init_admin_is_idempotent() {
        let (_, auth) = service();
        assert!(auth.init_admin().await.unwrap());
        assert!(!auth.init_admin().await.unwrap());

        let admins: Vec<_> = auth.all_users().await.into_iter().filter(|u| u.is_admin).collect();
        assert_eq!(admins.len(), 1);
        assert!(admins[0].is_approved);
        assert_eq!(admins[0].email, "admin@admin.com");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_regardless_of_password() {
        let (_, auth) = service();
        auth.register("ana@example.com", "secret1").await.unwrap();
        let err = auth.register("ana@example.com", "other-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn registered_user_is_pending_and_can_log_in() {
        let (_, auth) = service();
        let user = auth.register("ana@example.com", "secret1").await.unwrap();
        assert!(!user.is_approved);
        assert!(!user.is_admin);

        let session = auth.login("ana@example.com", "secret1").await.unwrap();
        assert_eq!(session.user.id, user.id);
        assert_eq!(AccessLevel::of(Some(&session.user)), AccessLevel::Pending);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (_, auth) = service();
        auth.register("ana@example.com", "secret1").await.unwrap();

        let wrong_password = auth.login("ana@example.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("bob@example.com", "secret1").await.unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let (_, auth) = service();
        auth.register("ana@example.com", "secret1").await.unwrap();
        assert!(auth.login("Ana@example.com", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn passwords_are_not_stored_in_plaintext() {
        let (memory, auth) = service();
        auth.register("ana@example.com", "secret1").await.unwrap();
        let raw = memory.get(USERS_KEY).await.unwrap().unwrap();
        assert!(raw.contains("hashed:secret1"));
        assert!(!raw.contains("\"password\""));
    }

    #[tokio::test]
    async fn session_is_a_snapshot_until_next_login() {
        let (_, auth) = service();
        let user = auth.register("ana@example.com", "secret1").await.unwrap();
        let first = auth.login("ana@example.com", "secret1").await.unwrap();

        assert!(auth.update_user_approval(&user.id, true).await.unwrap());
        let stale = auth.current_user(&first.token).await.unwrap();
        assert!(!stale.is_approved);

        let second = auth.login("ana@example.com", "secret1").await.unwrap();
        let fresh = auth.current_user(&second.token).await.unwrap();
        assert!(fresh.is_approved);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let (_, auth) = service();
        auth.register("ana@example.com", "secret1").await.unwrap();
        let session = auth.login("ana@example.com", "secret1").await.unwrap();

        auth.logout(&session.token).await;
        auth.logout(&session.token).await;
        assert!(auth.current_user(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_or_expired_sessions_read_as_logged_out() {
        let (memory, auth) = service();
        memory.set(&session_key("garbage"), "not json").await.unwrap();
        assert!(auth.current_user("garbage").await.is_none());

        let user = auth.register("ana@example.com", "secret1").await.unwrap();
        let expired = AuthSession {
            token: "old".to_string(),
            user,
            created_at: Utc::now() - Duration::days(40),
            expires_at: Utc::now() - Duration::days(10),
        };
        memory
            .set(&session_key("old"), &serde_json::to_string(&expired).unwrap())
            .await
            .unwrap();
        assert!(auth.current_user("old").await.is_none());
        assert!(memory.get(&session_key("old")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn approval_of_unknown_user_is_a_no_op() {
        let (_, auth) = service();
        auth.init_admin().await.unwrap();
        assert!(!auth.update_user_approval("user-missing", true).await.unwrap());
        assert_eq!(auth.all_users().await.len(), 1);
    }

    fn flaky_service() -> (Arc<FlakyStore>, AuthService) {
        let flaky = Arc::new(FlakyStore::default());
        let service = AuthService::new(
            JsonStore::new(flaky.clone()),
            Arc::new(TaggingHasher),
            AdminSeed::default(),
        );
        (flaky, service)
    }

    fn emails(users: Vec<User>) -> Vec<String> {
        users.into_iter().map(|u| u.email).collect()
    }

    #[tokio::test]
    async fn failed_user_read_aborts_writes_instead_of_wiping_users() {
        let (flaky, auth) = flaky_service();
        auth.init_admin().await.unwrap();
        let ana = auth.register("ana@example.com", "secret1").await.unwrap();

        flaky.fail_next_get();
        let err = auth.register("bob@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));

        flaky.fail_next_get();
        assert!(auth.update_user_approval(&ana.id, true).await.is_err());

        flaky.fail_next_get();
        assert!(auth.init_admin().await.is_err());

        let users = auth.all_users().await;
        assert!(!users.iter().any(|u| u.is_approved && !u.is_admin));
        assert_eq!(emails(users), vec!["admin@admin.com", "ana@example.com"]);
    }

    /// Counts `verify` calls on top of `TaggingHasher`.
    #[derive(Default)]
    struct CountingHasher {
        verifies: AtomicUsize,
    }

    impl CredentialHasher for CountingHasher {
        fn hash(&self, password: &str) -> PortResult<String> {
            TaggingHasher.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            self.verifies.fetch_add(1, Ordering::SeqCst);
            TaggingHasher.verify(password, hash)
        }
    }

    #[tokio::test]
    async fn unknown_email_costs_the_same_hash_check_as_a_wrong_password() {
        let hasher = Arc::new(CountingHasher::default());
        let auth = AuthService::new(
            JsonStore::new(Arc::new(MemoryStore::new())),
            hasher.clone(),
            AdminSeed::default(),
        );
        auth.register("ana@example.com", "secret1").await.unwrap();

        assert!(auth.login("ana@example.com", "wrong-pass").await.is_err());
        assert_eq!(hasher.verifies.swap(0, Ordering::SeqCst), 1);

        assert!(auth.login("bob@example.com", "wrong-pass").await.is_err());
        assert_eq!(hasher.verifies.swap(0, Ordering::SeqCst), 1);

        // an unknown e-mail fails even with the decoy password
        assert!(auth.login("bob@example.com", DECOY_PASSWORD).await.is_err());
    }

    #[tokio::test]
    async fn logout_survives_a_failed_delete() {
        let (flaky, auth) = flaky_service();
        auth.register("ana@example.com", "secret1").await.unwrap();
        let session = auth.login("ana@example.com", "secret1").await.unwrap();

        flaky.fail_removes();
        auth.logout(&session.token).await;
        assert!(auth.current_user(&session.token).await.is_some());
    }

    #[test]
    fn registration_form_rules() {
        assert!(validate_registration("a@b.com", "secret1", "secret1").is_ok());
        assert!(matches!(
            validate_registration("a@b.com", "secret1", "secret2"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("a@b.com", "short", "short"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("  ", "secret1", "secret1"),
            Err(AuthError::Validation(_))
        ));
    }
}
