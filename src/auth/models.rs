//! Authentication Models
//! Mission: Define customer, credential and token data structures

use serde::{Deserialize, Serialize};

/// Customer account, the authenticated principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub email: String,
    pub password_hash: String, // bcrypt hash - never leaves the server
    pub is_admin: bool,
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // customer email
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

/// Create/update body for a customer
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl CustomerDraft {
    /// Field-level checks done before anything touches the store
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_email(&self.email) {
            return Err(format!("'{}' is not a valid email address", self.email));
        }
        if self.password.is_empty() {
            return Err("password must not be empty".to_string());
        }
        if self.age < 0 {
            return Err("age must not be negative".to_string());
        }
        Ok(())
    }
}

/// Shape check equivalent to `^\S+@\S+\.\S+$`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let bytes = email.as_bytes();
    let Some(at) = bytes.iter().skip(1).position(|&b| b == b'@').map(|i| i + 1) else {
        return false;
    };
    bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'.' && i >= at + 2 && i + 1 < bytes.len())
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64, // seconds until expiration
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// Customer response (sanitized)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerResponse {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub email: String,
    pub is_admin: bool,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            age: customer.age,
            email: customer.email.clone(),
            is_admin: customer.is_admin,
        }
    }
}
