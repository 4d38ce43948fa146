//! Form validation, reported per field.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// Messages keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
        false
    } else {
        true
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFormValues {
    pub user_email: String,
}

impl ProfileFormValues {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if required(&mut errors, "userEmail", &self.user_email) && !EMAIL.is_match(self.user_email.trim()) {
            errors.add("userEmail", INVALID_EMAIL);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserFormValues {
    pub user_name: String,
}

impl CreateUserFormValues {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        required(&mut errors, "userName", &self.user_name);
        errors.into_result()
    }
}

/// Values of the bulk DAO attribution form. `None` means "No DAO".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDaoAttributeFormValues {
    pub dao_id: Option<i32>,
}

impl BulkDaoAttributeFormValues {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if matches!(self.dao_id, Some(id) if id <= 0) {
            errors.add("daoId", "Please select a valid DAO.");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_email_is_required_and_checked() {
        let empty = ProfileFormValues::default().validate().unwrap_err();
        assert_eq!(empty.get("userEmail"), Some(REQUIRED));

        let bad = ProfileFormValues { user_email: "not-an-email".into() }.validate().unwrap_err();
        assert_eq!(bad.get("userEmail"), Some(INVALID_EMAIL));

        assert!(ProfileFormValues { user_email: "dev@protocol.xyz".into() }.validate().is_ok());
    }

    #[test]
    fn user_name_is_required() {
        let err = CreateUserFormValues { user_name: "   ".into() }.validate().unwrap_err();
        assert_eq!(err.to_string(), format!("userName: {}", REQUIRED));
        assert!(CreateUserFormValues { user_name: "ada".into() }.validate().is_ok());
    }

    #[test]
    fn dao_id_may_be_empty_but_not_bogus() {
        assert!(BulkDaoAttributeFormValues { dao_id: None }.validate().is_ok());
        assert!(BulkDaoAttributeFormValues { dao_id: Some(42) }.validate().is_ok());
        assert!(BulkDaoAttributeFormValues { dao_id: Some(0) }.validate().is_err());
    }
}
