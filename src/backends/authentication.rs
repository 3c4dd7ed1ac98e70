/// Authentication backends
///
/// Turn a credential payload into an access/refresh token pair.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::backends::credentials::{LoginEmailIn, LoginPayload, LoginUserIn, PasswordCredentials};
use crate::error::AppError;
use crate::schemas::TokenAccess;
use crate::store::{User, UserStore};

/// Hashed once per backend and verified against when the principal does not exist
const DUMMY_PASSWORD: &str = "simple-jwt-timing-equalizer";

/// Sign-in capability
///
/// Implement this directly for custom credential schemes; the
/// store-backed `BackendAuthentication` covers email and username logins.
#[async_trait]
pub trait AuthenticationBackend: Send + Sync + 'static {
    type Credentials: LoginPayload;

    /// # Errors
    /// `AuthError::Unauthorized` for rejected credentials; store and
    /// hashing failures are returned as they are.
    async fn authenticate(&self, credentials: Self::Credentials) -> Result<TokenAccess, AppError>;
}

type Eligibility = dyn Fn(&User) -> bool + Send + Sync;

/// Password authentication against a `UserStore`
pub struct BackendAuthentication<C> {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<TokenIssuer>,
    dummy_hash: String,
    eligibility: Box<Eligibility>,
    _credentials: PhantomData<fn() -> C>,
}

/// Sign-in with `{email, password}`
pub type EmailBackendAuthentication = BackendAuthentication<LoginEmailIn>;

/// Sign-in with `{username, password}`
pub type UsernameBackendAuthentication = BackendAuthentication<LoginUserIn>;

impl<C: PasswordCredentials> BackendAuthentication<C> {
    /// # Errors
    /// Returns error if the dummy hash cannot be computed
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<TokenIssuer>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            hasher,
            issuer,
            dummy_hash,
            eligibility: Box::new(user_is_active),
            _credentials: PhantomData,
        })
    }

    /// Replace the eligibility predicate (default: `is_active`, absent means eligible)
    pub fn with_eligibility<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&User) -> bool + Send + Sync + 'static,
    {
        self.eligibility = Box::new(predicate);
        self
    }

    pub fn user_can_authenticate(&self, user: &User) -> bool {
        (self.eligibility)(user)
    }

    // bcrypt is CPU-bound; keep it off the actix worker thread
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }
}

/// Reject users with `is_active == Some(false)`; stores without the flag are allowed
pub fn user_is_active(user: &User) -> bool {
    user.is_active.unwrap_or(true)
}

#[async_trait]
impl<C: PasswordCredentials> AuthenticationBackend for BackendAuthentication<C> {
    type Credentials = C;

    async fn authenticate(&self, credentials: C) -> Result<TokenAccess, AppError> {
        let user = self.store.find_user(&credentials.lookup()).await?;

        let user = match user {
            Some(user) => user,
            None => {
                // Same single verify as the wrong-password path
                self.verify_password(credentials.password(), &self.dummy_hash)
                    .await?;
                tracing::info!("Sign-in rejected: unknown principal");
                return Err(AppError::invalid_credentials());
            }
        };

        let password_valid = self
            .verify_password(credentials.password(), &user.password_hash)
            .await?;
        if !password_valid {
            tracing::info!(user_id = %user.id, "Sign-in rejected: wrong password");
            return Err(AppError::invalid_credentials());
        }

        if !self.user_can_authenticate(&user) {
            tracing::info!(user_id = %user.id, "Sign-in rejected: principal not eligible");
            return Err(AppError::invalid_credentials());
        }

        let tokens = self.issuer.issue_pair(&user.id)?;

        tracing::info!(user_id = %user.id, "User signed in successfully");

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::auth::BcryptHasher;
    use crate::configuration::JwtSettings;
    use crate::error::{AuthError, StoreError};
    use crate::store::{InMemoryUserStore, UserLookup};

    struct CountingHasher {
        inner: BcryptHasher,
        verify_calls: AtomicUsize,
    }

    impl CountingHasher {
        fn new() -> Self {
            Self {
                inner: BcryptHasher::with_cost(4),
                verify_calls: AtomicUsize::new(0),
            }
        }

        fn verify_calls(&self) -> usize {
            self.verify_calls.load(Ordering::SeqCst)
        }
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, password: &str) -> Result<String, AppError> {
            self.inner.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(password, hash)
        }
    }

    struct UnavailableStore;

    #[async_trait]
    impl UserStore for UnavailableStore {
        async fn find_user(&self, _lookup: &UserLookup) -> Result<Option<User>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn issuer() -> Arc<TokenIssuer> {
        let settings = JwtSettings::with_signing_key("test-secret-key-at-least-32-characters-long");
        Arc::new(TokenIssuer::from_settings(&settings).unwrap())
    }

    fn store_with(hasher: &dyn PasswordHasher, is_active: Option<bool>) -> Arc<InMemoryUserStore> {
        let store = InMemoryUserStore::new();
        store
            .insert(User {
                id: "1".to_string(),
                email: Some("foo@bar.com".to_string()),
                username: Some("test".to_string()),
                password_hash: hasher.hash("12345").unwrap(),
                is_active,
            })
            .unwrap();
        Arc::new(store)
    }

    fn email(email: &str, password: &str) -> LoginEmailIn {
        LoginEmailIn {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn assert_invalid_credentials(result: Result<TokenAccess, AppError>) {
        match result {
            Err(AppError::Auth(AuthError::Unauthorized(msg))) => {
                assert_eq!(msg, "Invalid credentials")
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_valid_credentials_return_tagged_pair() {
        let hasher = Arc::new(CountingHasher::new());
        let issuer = issuer();
        let backend = EmailBackendAuthentication::new(
            store_with(hasher.as_ref(), Some(true)),
            hasher.clone(),
            issuer.clone(),
        )
        .unwrap();

        let tokens = backend
            .authenticate(email("foo@bar.com", "12345"))
            .await
            .expect("Authentication failed");

        let access = issuer.verify(&tokens.access_token).unwrap();
        let refresh = issuer.verify(&tokens.refresh_token).unwrap();
        assert_eq!(access.sub, "1");
        assert_eq!(access.token_type.as_deref(), Some("access_token"));
        assert_eq!(refresh.token_type.as_deref(), Some("refresh_token"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let hasher = Arc::new(CountingHasher::new());
        let backend = EmailBackendAuthentication::new(
            store_with(hasher.as_ref(), None),
            hasher.clone(),
            issuer(),
        )
        .unwrap();

        assert_invalid_credentials(backend.authenticate(email("foo@bar.com", "wrong")).await);
    }

    #[tokio::test]
    async fn test_unknown_user_is_unauthorized() {
        let hasher = Arc::new(CountingHasher::new());
        let backend = EmailBackendAuthentication::new(
            store_with(hasher.as_ref(), None),
            hasher.clone(),
            issuer(),
        )
        .unwrap();

        assert_invalid_credentials(backend.authenticate(email("nobody@bar.com", "12345")).await);
    }

    #[tokio::test]
    async fn test_both_failure_paths_verify_once() {
        let hasher = Arc::new(CountingHasher::new());
        let backend = EmailBackendAuthentication::new(
            store_with(hasher.as_ref(), None),
            hasher.clone(),
            issuer(),
        )
        .unwrap();

        let before = hasher.verify_calls();
        let _ = backend.authenticate(email("nobody@bar.com", "12345")).await;
        let unknown_user_calls = hasher.verify_calls() - before;

        let before = hasher.verify_calls();
        let _ = backend.authenticate(email("foo@bar.com", "wrong")).await;
        let wrong_password_calls = hasher.verify_calls() - before;

        assert_eq!(unknown_user_calls, 1);
        assert_eq!(unknown_user_calls, wrong_password_calls);
    }

    #[tokio::test]
    async fn test_inactive_user_is_unauthorized() {
        let hasher = Arc::new(CountingHasher::new());
        let backend = EmailBackendAuthentication::new(
            store_with(hasher.as_ref(), Some(false)),
            hasher.clone(),
            issuer(),
        )
        .unwrap();

        assert_invalid_credentials(backend.authenticate(email("foo@bar.com", "12345")).await);
    }

    #[tokio::test]
    async fn test_custom_eligibility() {
        let hasher = Arc::new(CountingHasher::new());
        let backend = EmailBackendAuthentication::new(
            store_with(hasher.as_ref(), Some(true)),
            hasher.clone(),
            issuer(),
        )
        .unwrap()
        .with_eligibility(|user| user.username.as_deref() != Some("test"));

        assert_invalid_credentials(backend.authenticate(email("foo@bar.com", "12345")).await);
    }

    #[tokio::test]
    async fn test_username_backend() {
        let hasher = Arc::new(CountingHasher::new());
        let backend = UsernameBackendAuthentication::new(
            store_with(hasher.as_ref(), None),
            hasher.clone(),
            issuer(),
        )
        .unwrap();

        let credentials = LoginUserIn {
            username: "test".to_string(),
            password: "12345".to_string(),
        };
        assert!(backend.authenticate(credentials).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let hasher = Arc::new(CountingHasher::new());
        let backend =
            EmailBackendAuthentication::new(Arc::new(UnavailableStore), hasher.clone(), issuer())
                .unwrap();

        let result = backend.authenticate(email("foo@bar.com", "12345")).await;
        assert!(matches!(
            result,
            Err(AppError::Store(StoreError::Unavailable(_)))
        ));
        assert_eq!(hasher.verify_calls(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_verification_runs_off_the_async_thread() {
        struct ThreadRecordingHasher {
            inner: BcryptHasher,
            verify_thread: std::sync::Mutex<Option<std::thread::ThreadId>>,
        }

        impl PasswordHasher for ThreadRecordingHasher {
            fn hash(&self, password: &str) -> Result<String, AppError> {
                self.inner.hash(password)
            }

            fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
                *self.verify_thread.lock().unwrap() = Some(std::thread::current().id());
                self.inner.verify(password, hash)
            }
        }

        let hasher = Arc::new(ThreadRecordingHasher {
            inner: BcryptHasher::with_cost(4),
            verify_thread: std::sync::Mutex::new(None),
        });
        let backend = EmailBackendAuthentication::new(
            store_with(hasher.as_ref(), Some(true)),
            hasher.clone(),
            issuer(),
        )
        .unwrap();

        assert!(backend.authenticate(email("foo@bar.com", "12345")).await.is_ok());

        let verify_thread = hasher.verify_thread.lock().unwrap().expect("verify was not called");
        assert_ne!(verify_thread, std::thread::current().id());
    }

    #[test]
    fn test_default_eligibility() {
        let mut user = User {
            id: "1".to_string(),
            email: None,
            username: None,
            password_hash: String::new(),
            is_active: None,
        };
        assert!(user_is_active(&user));

        user.is_active = Some(false);
        assert!(!user_is_active(&user));
    }
}
