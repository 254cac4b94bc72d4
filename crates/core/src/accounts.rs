//! Registration input rules.

use std::fmt;

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

/// Message shown when the username or email already belongs to an account.
pub const DUPLICATE_ACCOUNT_MESSAGE: &str = "Username or email already registered.";

/// Field order used when reporting validation problems, so messages come out
/// in the same order as the form.
const FIELD_ORDER: [&str; 4] = ["username", "email", "password", "confirm_password"];

/// Registration form as submitted by the browser.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct Registration {
    #[serde(default)]
    #[validate(length(min = 3, message = "Username must be at least 3 characters."))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
    #[serde(default)]
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

// Passwords stay out of logs.
impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Registration {
    /// Trim the username and email, and lowercase the email.
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }

    /// Every problem with this registration, in form order.
    pub fn problems(&self) -> Vec<String> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        let by_field = errors.field_errors();

        FIELD_ORDER
            .iter()
            .filter_map(|field| by_field.get(*field))
            .flat_map(|errs| errs.iter())
            .map(|err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}.", err.code))
            })
            .collect()
    }

    /// Validate the registration, joining all problems into one
    /// [`CoreError::Validation`] message.
    pub fn check(&self) -> Result<(), CoreError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(problems.join(" ")))
        }
    }
}
