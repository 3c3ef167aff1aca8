//! Credential storage and verification.

use bazaar_core::Password;

/// How passwords are stored at signup and checked at login.
///
/// Implementations must be deterministic for a given stored value: `verify`
/// is called with whatever `store` produced for that account.
pub trait CredentialScheme: Send + Sync {
    /// Turn a submitted password into its stored form.
    fn store(&self, password: Password) -> Password;

    /// Check a presented password against the stored form.
    fn verify(&self, presented: &str, stored: &Password) -> bool;
}

/// Stores passwords as submitted and compares by exact equality.
///
/// Existing accounts hold plaintext passwords, so this is the scheme the
/// API runs with. A hashing scheme can replace it once stored records are
/// migrated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextScheme;

impl CredentialScheme for PlaintextScheme {
    fn store(&self, password: Password) -> Password {
        password
    }

    fn verify(&self, presented: &str, stored: &Password) -> bool {
        presented == stored.expose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_round_trip() {
        let scheme = PlaintextScheme;
        let stored = scheme.store(Password::new("p1"));

        assert_eq!(stored.expose(), "p1");
        assert!(scheme.verify("p1", &stored));
    }

    #[test]
    fn test_plaintext_is_exact() {
        let stored = Password::new("Secret");

        assert!(!PlaintextScheme.verify("secret", &stored));
        assert!(!PlaintextScheme.verify("Secret ", &stored));
        assert!(!PlaintextScheme.verify("", &stored));
    }
}
