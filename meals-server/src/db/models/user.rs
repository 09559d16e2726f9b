//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::CartData;
use shared::types::Role;
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

/// User record: credentials, role, cart, optional reset-token fields.
///
/// The cart lives on the user document (item id -> positive quantity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    #[serde(default)]
    pub cart: CartData,
    /// Signed reset token, set on forgot-password, cleared on reset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    /// Token expiry as unix millis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_expires: Option<i64>,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub hash_pass: String,
    pub role: Role,
    pub cart: CartData,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Persisted id as a "user:key" string
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_and_verify() {
        let hash = User::hash_password("password1").unwrap();
        let user = User {
            id: None,
            name: "a".into(),
            email: "a@x.com".into(),
            hash_pass: hash,
            role: Role::User,
            cart: CartData::new(),
            reset_token: None,
            reset_expires: None,
        };
        assert!(user.verify_password("password1").unwrap());
        assert!(!user.verify_password("password2").unwrap());
    }

    #[test]
    fn hash_pass_never_serialized() {
        let user = User {
            id: None,
            name: "a".into(),
            email: "a@x.com".into(),
            hash_pass: "secret-hash".into(),
            role: Role::User,
            cart: CartData::new(),
            reset_token: None,
            reset_expires: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
