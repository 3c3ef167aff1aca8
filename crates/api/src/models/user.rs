//! User account documents.

use serde::{Deserialize, Serialize};

use bazaar_core::{Email, Password, UserId};

/// A shopper account.
///
/// Serializes with the password included: the login response hands the full
/// record back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: Email,
    pub password: Password,
    pub name: String,
    pub post_code: String,
    pub address: String,
}

/// Validated signup fields.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password: Password,
    pub name: String,
    pub post_code: String,
    pub address: String,
}

impl NewUser {
    /// Assign a fresh id.
    #[must_use]
    pub fn into_user(self) -> User {
        User {
            id: UserId::generate(),
            email: self.email,
            password: self.password,
            name: self.name,
            post_code: self.post_code,
            address: self.address,
        }
    }
}
