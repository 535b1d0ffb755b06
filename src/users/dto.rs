use serde::Deserialize;

use crate::validation::{is_valid_email, Validate};

/// Body of `PATCH /users`. Id and password hash cannot be changed here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Validate for EditUserRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(email) = &self.email {
            if !is_valid_email(email.trim()) {
                return Err("email must be an email".into());
            }
        }
        Ok(())
    }
}
