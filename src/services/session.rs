// src/services/session.rs

use std::fs;
use std::path::PathBuf;

use validator::Validate;

use crate::{
    api::AuthApi,
    common::error::AppError,
    models::auth::{LoginPayload, User},
};

// Names of the two durable storage slots.
const JWT_SLOT: &str = "jwt";
const USER_SLOT: &str = "user";

// The single process-wide session: the authenticated operator and their
// bearer token, persisted across runs via two files under the state dir.
// There is no server-side revocation; logout is a pure client-side forget.
// Concurrent logins are not guarded against.
#[derive(Debug)]
pub struct SessionStore {
    dir: PathBuf,
    user: Option<User>,
    token: Option<String>,
    loading: bool,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            user: None,
            token: None,
            loading: true,
        }
    }

    // Attempts to read a previously persisted token+user pair. Session state
    // is restored only when BOTH slots are present and readable. `loading`
    // flips to false exactly once, whatever the outcome.
    pub fn restore(&mut self) {
        let jwt = fs::read_to_string(self.dir.join(JWT_SLOT)).ok();
        let user_raw = fs::read_to_string(self.dir.join(USER_SLOT)).ok();

        if let (Some(jwt), Some(user_raw)) = (jwt, user_raw) {
            match serde_json::from_str::<User>(&user_raw) {
                Ok(user) => {
                    self.token = Some(jwt);
                    self.user = Some(user);
                }
                Err(e) => tracing::error!("stored session is unreadable, ignoring it: {e}"),
            }
        }

        self.loading = false;
    }

    // Validates the credentials, calls the auth endpoint and, on success,
    // stores {token, user} in memory and in both durable slots. On failure
    // the error propagates and no state changes.
    pub async fn login(
        &mut self,
        api: &AuthApi,
        credentials: &LoginPayload,
    ) -> Result<(), AppError> {
        credentials.validate()?;

        let auth = api.login(credentials).await?;

        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(JWT_SLOT), &auth.jwt)?;
        fs::write(self.dir.join(USER_SLOT), serde_json::to_string(&auth.user)?)?;

        self.token = Some(auth.jwt);
        self.user = Some(auth.user);
        Ok(())
    }

    // Clears in-memory state and removes both durable slots. Missing slot
    // files are fine; there is nothing to report about a forgotten session.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        let _ = fs::remove_file(self.dir.join(JWT_SLOT));
        let _ = fs::remove_file(self.dir.join(USER_SLOT));
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // Every authenticated command goes through here before touching the
    // network.
    pub fn require_token(&self) -> Result<&str, AppError> {
        self.token().ok_or(AppError::NotLoggedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "rahul".into(),
            email: "rahul@example.com".into(),
            confirmed: true,
            blocked: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seeded_store(dir: &std::path::Path) -> SessionStore {
        fs::write(dir.join(JWT_SLOT), "token-123").unwrap();
        fs::write(
            dir.join(USER_SLOT),
            serde_json::to_string(&sample_user()).unwrap(),
        )
        .unwrap();
        SessionStore::new(dir.to_path_buf())
    }

    #[test]
    fn restore_requires_both_slots() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(JWT_SLOT), "token-123").unwrap();

        let mut store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.is_loading());
        store.restore();

        assert!(!store.is_loading());
        assert!(store.token().is_none());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn restore_reads_persisted_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded_store(dir.path());
        store.restore();

        assert_eq!(store.token(), Some("token-123"));
        assert_eq!(store.current_user().unwrap().username, "rahul");
        assert!(!store.is_loading());
    }

    #[test]
    fn logout_removes_both_slots() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded_store(dir.path());
        store.restore();

        store.logout();

        assert!(store.token().is_none());
        assert!(store.current_user().is_none());
        assert!(!dir.path().join(JWT_SLOT).exists());
        assert!(!dir.path().join(USER_SLOT).exists());
    }

    #[tokio::test]
    async fn login_with_invalid_credentials_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path().to_path_buf());
        store.restore();

        let api = AuthApi::new(ApiClient::new("http://127.0.0.1:9"));
        let credentials = LoginPayload {
            email: "not-an-email".into(),
            password: "secret123".into(),
        };

        let result = store.login(&api, &credentials).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(store.token().is_none());
        assert!(!dir.path().join(JWT_SLOT).exists());
    }
}
