use serde::{Deserialize, Serialize};

use crate::validation::{is_valid_email, Validate};

/// Request body for both signup and signin.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl Validate for AuthRequest {
    fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() {
            return Err("email should not be empty".into());
        }
        if !is_valid_email(self.email.trim()) {
            return Err("email must be an email".into());
        }
        if self.password.is_empty() {
            return Err("password should not be empty".into());
        }
        Ok(())
    }
}

/// Response returned after signup or signin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
}
