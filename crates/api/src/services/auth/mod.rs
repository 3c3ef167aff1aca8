//! Authentication service.
//!
//! Account Access: login by email and password, and signup. How passwords are
//! stored and compared is delegated to a [`CredentialScheme`].

mod error;
mod scheme;

pub use error::AuthError;
pub use scheme::{CredentialScheme, PlaintextScheme};

use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{Email, Password};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{NewUser, User};

/// Signup fields as submitted. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub post_code: String,
    pub address: String,
}

impl SignupForm {
    fn validate(self) -> Result<NewUser, AuthError> {
        for (field, value) in [
            ("email", &self.email),
            ("password", &self.password),
            ("name", &self.name),
            ("postCode", &self.post_code),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::MissingField(field));
            }
        }

        Ok(NewUser {
            email: Email::parse(&self.email)?,
            password: Password::new(self.password),
            name: self.name,
            post_code: self.post_code,
            address: self.address,
        })
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a dyn UserRepository,
    scheme: &'a dyn CredentialScheme,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserRepository, scheme: &'a dyn CredentialScheme) -> Self {
        Self { users, scheme }
    }

    /// Login with email and password.
    ///
    /// Unknown emails, malformed emails and wrong passwords all fail the same
    /// way.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.scheme.verify(password, &user.password) {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a field is empty.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip_all)]
    pub async fn signup(&self, form: SignupForm) -> Result<User, AuthError> {
        let mut new_user = form.validate()?;
        new_user.password = self.scheme.store(new_user.password);

        let user = new_user.into_user();
        self.users.insert_user(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn form(email: &str, password: &str) -> SignupForm {
        SignupForm {
            email: email.to_string(),
            password: password.to_string(),
            name: "Ada".to_string(),
            post_code: "12345".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &PlaintextScheme);

        let created = auth.signup(form("a@x.io", "p1")).await.unwrap();
        let logged_in = auth.login("a@x.io", "p1").await.unwrap();

        assert_eq!(created, logged_in);
        assert_eq!(logged_in.post_code, "12345");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &PlaintextScheme);
        auth.signup(form("a@x.io", "p1")).await.unwrap();

        assert!(matches!(
            auth.login("a@x.io", "p2").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_or_malformed_email() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &PlaintextScheme);

        assert!(matches!(
            auth.login("nobody@x.io", "p1").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("not-an-email", "p1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &PlaintextScheme);
        auth.signup(form("a@x.io", "p1")).await.unwrap();

        assert!(matches!(
            auth.signup(form("a@x.io", "other")).await,
            Err(AuthError::UserAlreadyExists)
        ));
        assert_eq!(store.users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_signup_requires_every_field() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &PlaintextScheme);

        let mut missing_address = form("a@x.io", "p1");
        missing_address.address = "  ".to_string();

        assert!(matches!(
            auth.signup(missing_address).await,
            Err(AuthError::MissingField("address"))
        ));
        assert!(matches!(
            auth.signup(SignupForm::default()).await,
            Err(AuthError::MissingField("email"))
        ));
        assert!(store.users().await.is_empty());
    }

    #[tokio::test]
    async fn test_signup_rejects_malformed_email() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store, &PlaintextScheme);

        assert!(matches!(
            auth.signup(form("no-at-sign", "p1")).await,
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_signup_form_reads_camel_case() {
        let form: SignupForm = serde_json::from_str(
            r#"{"email":"a@x.io","password":"p1","name":"Ada","postCode":"12345"}"#,
        )
        .unwrap();

        assert_eq!(form.post_code, "12345");
        assert!(form.address.is_empty());
    }
}
