//! Client-side checks run before any request is sent.

use lazy_static::lazy_static;
use regex::Regex;

use crate::api::{ApiErr, ApiResult, ClassPayload, CohortPayload, Registration, Role};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const NAME_REQUIRED: &str = "Name is required";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Emails queued for invitation on the project form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteList {
    emails: Vec<String>,
}

impl InviteList {
    /// Queues `input` if it is an email. Blank input is ignored.
    pub fn add(&mut self, input: &str) -> ApiResult<bool> {
        let email = input.trim();
        if email.is_empty() {
            return Ok(false);
        }

        if !is_valid_email(email) {
            return Err(ApiErr::Validation(INVALID_EMAIL.to_string()));
        }

        self.emails.push(email.to_string());
        Ok(true)
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.emails.len() {
            self.emails.remove(index);
        }
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: Role::Student,
        }
    }
}

impl SignupForm {
    /// The registration body, without the confirmation field.
    pub fn registration(&self) -> ApiResult<Registration> {
        if self.password != self.confirm_password {
            return Err(ApiErr::Validation(PASSWORD_MISMATCH.to_string()));
        }

        Ok(Registration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
        })
    }
}

pub fn class_payload(name: &str, description: &str) -> ApiResult<ClassPayload> {
    if name.trim().is_empty() {
        return Err(ApiErr::Validation(NAME_REQUIRED.to_string()));
    }

    Ok(ClassPayload {
        name: name.trim().to_string(),
        description: description.to_string(),
    })
}

pub fn cohort_payload(name: &str, start_date: &str, end_date: &str) -> ApiResult<CohortPayload> {
    if name.trim().is_empty() {
        return Err(ApiErr::Validation(NAME_REQUIRED.to_string()));
    }

    Ok(CohortPayload {
        name: name.trim().to_string(),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("student@moringa.school"));
        assert!(!is_valid_email("student@moringa"));
        assert!(!is_valid_email("stu dent@moringa.school"));
        assert!(!is_valid_email("@moringa.school"));
    }

    #[test]
    fn invite_list_rejects_bad_emails() {
        let mut invites = InviteList::default();

        assert_eq!(invites.add("  "), Ok(false));
        assert_eq!(invites.add("not-an-email"), Err(ApiErr::Validation(INVALID_EMAIL.into())));
        assert_eq!(invites.add(" ada@example.com "), Ok(true));
        assert_eq!(invites.add("lin@example.com"), Ok(true));

        invites.remove(0);
        assert_eq!(invites.emails(), ["lin@example.com".to_string()]);
        invites.remove(5);
        assert_eq!(invites.emails().len(), 1);
    }

    #[test]
    fn signup_passwords_must_match() {
        let form = SignupForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            role: Role::Student,
        };
        assert_eq!(form.registration(), Err(ApiErr::Validation(PASSWORD_MISMATCH.into())));

        let form = SignupForm { confirm_password: "secret1".into(), ..form };
        let body = serde_json::to_value(form.registration().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1", "role": "Student" })
        );
    }

    #[test]
    fn class_and_cohort_need_a_name() {
        assert!(class_payload(" ", "x").is_err());
        assert_eq!(class_payload("SE-01", "").unwrap().name, "SE-01");
        assert!(cohort_payload("", "2026-01-05", "2026-06-30").is_err());
    }
}
