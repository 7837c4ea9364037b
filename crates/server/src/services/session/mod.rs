//! Session store.
//!
//! Holds the one signed-in user. Login and signup wait out a simulated
//! delay; each takes a request token first, and only the newest request may
//! commit when its delay ends. Logout also advances the token, so a sign-in
//! that was in flight when the user logged out never resurrects the session.

mod error;
mod storage;
mod verifier;

pub use error::{SessionError, StorageError};
pub use storage::{FileSessionStorage, MemorySessionStorage, SESSION_KEY, SessionStorage};
pub use verifier::{AcceptAnyCredentials, CredentialVerifier, StaticCredentials, hash_password};

use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;

use inventrak_core::settings::validate_password_change;
use inventrak_core::user::{ProfileUpdate, SignupDetails, User, validate_login};
use inventrak_core::{Email, UserId};
use tracing::{info, warn};

/// ID given to every user created by login.
const LOGIN_USER_ID: i32 = 1;

/// The current session and the operations that change it.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    verifier: Arc<dyn CredentialVerifier>,
    delay: Duration,
    current: RwLock<Option<User>>,
    generation: AtomicU64,
    next_user_id: AtomicI32,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("delay", &self.delay)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open the store, restoring any persisted user without re-validation.
    ///
    /// An unreadable record is discarded and the session starts signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the record cannot be read or a
    /// corrupt record cannot be removed.
    pub fn open(
        storage: Arc<dyn SessionStorage>,
        verifier: Arc<dyn CredentialVerifier>,
        delay: Duration,
    ) -> Result<Self, SessionError> {
        let restored = match storage.load() {
            Ok(user) => user,
            Err(StorageError::Corrupt(e)) => {
                warn!(error = %e, "Discarding unreadable session record");
                storage.clear()?;
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(user) = &restored {
            info!(user_id = %user.id, role = %user.role, "Restored session");
        }

        let next_user_id = restored
            .as_ref()
            .map_or(LOGIN_USER_ID, |u| u.id.as_i32().max(LOGIN_USER_ID))
            .saturating_add(1);

        Ok(Self {
            storage,
            verifier,
            delay,
            current: RwLock::new(restored),
            generation: AtomicU64::new(0),
            next_user_id: AtomicI32::new(next_user_id),
        })
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn write_current(&self) -> RwLockWriteGuard<'_, Option<User>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a new request token, invalidating every older one.
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Persist and install `user` if `token` is still the newest request.
    ///
    /// `prepare` runs after the token check while the session lock is held,
    /// so a request that reports `Superseded` has had no side effects.
    fn commit(
        &self,
        token: u64,
        user: User,
        prepare: impl FnOnce() -> Result<(), SessionError>,
    ) -> Result<User, SessionError> {
        let mut current = self.write_current();
        if self.generation.load(Ordering::SeqCst) != token {
            return Err(SessionError::Superseded);
        }
        prepare()?;
        self.storage.save(&user)?;
        *current = Some(user.clone());
        Ok(user)
    }

    /// Sign in. The identity fields other than email and role are
    /// synthesized.
    ///
    /// # Errors
    ///
    /// - `SessionError::Validation` for a blank or malformed field.
    /// - `SessionError::InvalidCredentials` if the verifier rejects the pair.
    /// - `SessionError::Superseded` if a newer request started meanwhile.
    /// - `SessionError::Storage` if the record cannot be written.
    pub async fn login(&self, email: &str, password: &str, role: &str) -> Result<User, SessionError> {
        let input = validate_login(email, password, role)?;
        let token = self.begin();
        self.simulate_latency().await;

        self.verifier.verify(&input.email, password)?;
        let user = self.commit(
            token,
            User::synthesized(UserId::new(LOGIN_USER_ID), input.email, input.role),
            || Ok(()),
        )?;
        info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(user)
    }

    /// Create an account and sign in as its admin.
    ///
    /// The account is registered only once the request is known to be the
    /// newest, so a superseded signup leaves no account behind.
    ///
    /// # Errors
    ///
    /// - `SessionError::Validation` for any blank field or a malformed email.
    /// - `SessionError::AlreadyRegistered` if the verifier knows the email.
    /// - `SessionError::Superseded` if a newer request started meanwhile.
    /// - `SessionError::Storage` if the record cannot be written.
    pub async fn signup(&self, details: &SignupDetails, password: &str) -> Result<User, SessionError> {
        let valid = details.validate(password)?;
        let token = self.begin();
        self.simulate_latency().await;

        let email = valid.email.clone();
        let id = UserId::new(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        let user = self.commit(token, User::from_signup(id, valid), || {
            self.verifier.register(&email, password)
        })?;
        info!(user_id = %user.id, "Signed up");
        Ok(user)
    }

    /// Sign out and delete the persisted record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the record cannot be deleted. The
    /// in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut current = self.write_current();
        self.begin();
        let previous = current.take();
        if let Some(user) = previous {
            info!(user_id = %user.id, "Signed out");
        }
        self.storage.clear()?;
        Ok(())
    }

    /// Apply a profile edit and re-persist the record.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotSignedIn` without a session.
    /// - `SessionError::Validation` for a missing required field.
    /// - `SessionError::Storage` if the record cannot be written.
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<User, SessionError> {
        let profile = update.validate()?;
        let mut current = self.write_current();
        let mut user = current.clone().ok_or(SessionError::NotSignedIn)?;
        user.apply_profile(profile);
        self.storage.save(&user)?;
        *current = Some(user.clone());
        Ok(user)
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// - `SessionError::Validation` if a field is blank, the confirmation
    ///   differs, or the new password is too short.
    /// - `SessionError::NotSignedIn` without a session.
    /// - `SessionError::InvalidCredentials` if the current password is wrong.
    pub fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<(), SessionError> {
        validate_password_change(current, new, confirm)?;
        let email: Email = self
            .current_user()
            .map(|u| u.email)
            .ok_or(SessionError::NotSignedIn)?;
        self.verifier.verify(&email, current)?;
        self.verifier.set_password(&email, new)?;
        info!("Password changed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use inventrak_core::Role;
    use inventrak_core::validation::ValidationError;
    use secrecy::SecretString;

    use super::*;
    use crate::config::CredentialEntry;

    const DELAY: Duration = Duration::from_millis(50);

    fn store_with(storage: Arc<dyn SessionStorage>, delay: Duration) -> SessionStore {
        SessionStore::open(storage, Arc::new(AcceptAnyCredentials), delay).unwrap()
    }

    fn signup_details() -> SignupDetails {
        SignupDetails {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            company_name: "Rao Provisions".to_string(),
            business_category: "Kirana".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_synthesizes_and_persists() {
        let storage = Arc::new(MemorySessionStorage::default());
        let store = store_with(storage.clone(), Duration::ZERO);

        let user = store.login("cashier@example.com", "pw", "cashier").await.unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.company_name, "Demo Store");
        assert_eq!(user.role, Role::Cashier);
        assert!(store.is_authenticated());
        assert_eq!(storage.load().unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_login_validation_leaves_session_untouched() {
        let storage = Arc::new(MemorySessionStorage::default());
        let store = store_with(storage.clone(), Duration::ZERO);

        let err = store.login("owner@example.com", "", "admin").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::Required { field: "password" })
        ));
        assert!(store.login("owner@example.com", "pw", "manager").await.is_err());
        assert!(!store.is_authenticated());
        assert!(storage.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_signup_is_always_admin_with_fresh_id() {
        let store = store_with(Arc::new(MemorySessionStorage::default()), Duration::ZERO);
        let first = store.signup(&signup_details(), "secret1").await.unwrap();
        assert_eq!(first.role, Role::Admin);
        assert_eq!(first.company_name, "Rao Provisions");
        assert_ne!(first.id, UserId::new(LOGIN_USER_ID));

        let second = store.signup(&signup_details(), "secret1").await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_signup_requires_every_field() {
        let store = store_with(Arc::new(MemorySessionStorage::default()), Duration::ZERO);
        let mut details = signup_details();
        details.phone = "  ".to_string();
        assert!(matches!(
            store.signup(&details, "secret1").await,
            Err(SessionError::Validation(_))
        ));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_record_and_reopen_is_signed_out() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::default());
        let store = store_with(storage.clone(), Duration::ZERO);
        store.login("owner@example.com", "pw", "admin").await.unwrap();

        let reopened = store_with(storage.clone(), Duration::ZERO);
        assert!(reopened.is_authenticated());

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert!(storage.load().unwrap().is_none());
        assert!(!store_with(storage, Duration::ZERO).is_authenticated());
    }

    #[tokio::test]
    async fn test_stale_login_does_not_overwrite_newer_user() {
        let store = store_with(Arc::new(MemorySessionStorage::default()), DELAY);

        let slow = store.login("first@example.com", "pw", "admin");
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.login("second@example.com", "pw", "cashier").await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert!(matches!(slow, Err(SessionError::Superseded)));
        assert_eq!(fast.unwrap().email.as_str(), "second@example.com");
        assert_eq!(
            store.current_user().unwrap().email.as_str(),
            "second@example.com"
        );
    }

    #[tokio::test]
    async fn test_logout_cancels_in_flight_login() {
        let storage = Arc::new(MemorySessionStorage::default());
        let store = store_with(storage.clone(), DELAY);

        let login = store.login("owner@example.com", "pw", "admin");
        let logout = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.logout()
        };
        let (login, logout) = tokio::join!(login, logout);

        logout.unwrap();
        assert!(matches!(login, Err(SessionError::Superseded)));
        assert!(!store.is_authenticated());
        assert!(storage.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_superseded_signup_registers_nothing() {
        let verifier = Arc::new(StaticCredentials::new(&[]));
        let store = SessionStore::open(
            Arc::new(MemorySessionStorage::default()),
            verifier.clone(),
            DELAY,
        )
        .unwrap();

        let details = signup_details();
        let signup = store.signup(&details, "secret1");
        let logout = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.logout()
        };
        let (signup, logout) = tokio::join!(signup, logout);

        logout.unwrap();
        assert!(matches!(signup, Err(SessionError::Superseded)));
        let email = Email::parse("asha@example.com").unwrap();
        assert!(matches!(
            verifier.verify(&email, "secret1"),
            Err(SessionError::InvalidCredentials)
        ));

        // The email is still free.
        store.signup(&signup_details(), "secret1").await.unwrap();
        verifier.verify(&email, "secret1").unwrap();
    }

    /// Registers after a pause so another request can land mid-registration.
    struct SlowRegistration {
        inner: StaticCredentials,
        pause: Duration,
    }

    impl CredentialVerifier for SlowRegistration {
        fn verify(&self, email: &Email, password: &str) -> Result<(), SessionError> {
            self.inner.verify(email, password)
        }

        fn register(&self, email: &Email, password: &str) -> Result<(), SessionError> {
            std::thread::sleep(self.pause);
            self.inner.register(email, password)
        }

        fn set_password(&self, email: &Email, password: &str) -> Result<(), SessionError> {
            self.inner.set_password(email, password)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_logout_during_registration_waits_for_signup() {
        let verifier = Arc::new(SlowRegistration {
            inner: StaticCredentials::new(&[]),
            pause: Duration::from_millis(100),
        });
        let store = Arc::new(
            SessionStore::open(
                Arc::new(MemorySessionStorage::default()),
                verifier.clone(),
                DELAY,
            )
            .unwrap(),
        );

        let racer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                tokio::time::sleep(DELAY + Duration::from_millis(30)).await;
                store.logout()
            })
        };
        let signup = store.signup(&signup_details(), "secret1").await;
        racer.await.unwrap().unwrap();

        let email = Email::parse("asha@example.com").unwrap();
        assert!(signup.is_ok());
        verifier.verify(&email, "secret1").unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());
        std::fs::write(storage.path(), b"garbage").unwrap();
        let path = storage.path().to_path_buf();

        let store = store_with(Arc::new(storage), Duration::ZERO);
        assert!(!store.is_authenticated());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_profile_update_repersists() {
        let storage = Arc::new(MemorySessionStorage::default());
        let store = store_with(storage.clone(), Duration::ZERO);

        let update = ProfileUpdate {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            company_name: "Rao Provisions".to_string(),
            ..ProfileUpdate::default()
        };
        assert!(matches!(
            store.update_profile(&update),
            Err(SessionError::NotSignedIn)
        ));

        store.login("owner@example.com", "pw", "admin").await.unwrap();
        let user = store.update_profile(&update).unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.business_category, "Kirana");
        assert_eq!(storage.load().unwrap().unwrap().company_name, "Rao Provisions");
    }

    #[tokio::test]
    async fn test_static_credentials_gate_login_and_password_change() {
        let entry = CredentialEntry {
            email: Email::parse("owner@example.com").unwrap(),
            password_hash: SecretString::from(hash_password("secret1").unwrap()),
        };
        let store = SessionStore::open(
            Arc::new(MemorySessionStorage::default()),
            Arc::new(StaticCredentials::new(&[entry])),
            Duration::ZERO,
        )
        .unwrap();

        assert!(matches!(
            store.login("owner@example.com", "wrong", "admin").await,
            Err(SessionError::InvalidCredentials)
        ));
        assert!(!store.is_authenticated());
        store.login("owner@example.com", "secret1", "admin").await.unwrap();

        assert!(matches!(
            store.change_password("secret1", "newpass", "newpas"),
            Err(SessionError::Validation(_))
        ));
        assert!(matches!(
            store.change_password("wrong", "newpass", "newpass"),
            Err(SessionError::InvalidCredentials)
        ));
        store.change_password("secret1", "newpass", "newpass").unwrap();

        store.logout().unwrap();
        assert!(store.login("owner@example.com", "secret1", "admin").await.is_err());
        store.login("owner@example.com", "newpass", "admin").await.unwrap();
    }
}
