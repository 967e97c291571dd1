//! Form field sets and validation.
//!
//! Each form kind is a statically-typed field set with a pure `validate`
//! method returning either the validated fields or a [`FormError`]. Field
//! presence is checked in declaration order and the first empty field
//! wins. Values are compared exactly; no trimming or normalisation is
//! applied. Credential correctness is out of scope here and belongs to
//! the auth crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures surfaced back onto the form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum FormError {
    #[error("field '{0}' is required")]
    RequiredFieldMissing(&'static str),

    #[error("passwords do not match")]
    PasswordMismatch,
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.is_empty() {
        Err(FormError::RequiredFieldMissing(field))
    } else {
        Ok(())
    }
}

/// Fields submitted on the registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Registration fields that survive validation. `confirm_password` is
/// dropped; it only exists to be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(self) -> Result<ValidRegistration, FormError> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        require("password", &self.password)?;
        require("confirm_password", &self.confirm_password)?;

        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }

        Ok(ValidRegistration {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password: self.password,
        })
    }
}

/// Fields submitted on the login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLogin {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(self) -> Result<ValidLogin, FormError> {
        require("username", &self.username)?;
        require("password", &self.password)?;

        Ok(ValidLogin {
            username: self.username,
            password: self.password,
        })
    }
}

/// Fields submitted on the post creation and update forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: String,
    pub content: String,
}

impl PostForm {
    pub fn validate(self) -> Result<ValidPost, FormError> {
        require("title", &self.title)?;
        require("content", &self.content)?;

        Ok(ValidPost {
            title: self.title,
            content: self.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_registration() -> RegistrationForm {
        RegistrationForm {
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            password: "a".to_string(),
            confirm_password: "a".to_string(),
        }
    }

    #[test]
    fn registration_succeeds_and_drops_confirm_password() {
        let valid = filled_registration().validate().unwrap();
        assert_eq!(valid.username, "jane");
        assert_eq!(valid.password, "a");
    }

    #[test]
    fn registration_rejects_password_mismatch() {
        let mut form = filled_registration();
        form.password = "a".to_string();
        form.confirm_password = "b".to_string();

        assert_eq!(form.validate().unwrap_err(), FormError::PasswordMismatch);
    }

    #[test]
    fn registration_reports_first_missing_field() {
        let mut form = filled_registration();
        form.email = String::new();
        form.password = String::new();

        assert_eq!(
            form.validate().unwrap_err(),
            FormError::RequiredFieldMissing("email")
        );
    }

    #[test]
    fn registration_does_not_trim_whitespace() {
        let mut form = filled_registration();
        form.confirm_password = "a ".to_string();

        assert_eq!(form.validate().unwrap_err(), FormError::PasswordMismatch);
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            username: "jane".to_string(),
            password: String::new(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::RequiredFieldMissing("password")
        );

        let form = LoginForm {
            username: "jane".to_string(),
            password: "secret".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn post_requires_title_and_content() {
        let form = PostForm {
            title: String::new(),
            content: "body".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::RequiredFieldMissing("title")
        );

        let form = PostForm {
            title: "Title".to_string(),
            content: String::new(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::RequiredFieldMissing("content")
        );

        let form = PostForm {
            title: "Title".to_string(),
            content: "body".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
