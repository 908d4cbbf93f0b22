//! Buyer information form draft.

use crate::rut;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field-level validation failures, keyed by field name.
///
/// All failing fields are reported at once so the form can highlight
/// every problem in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a single field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// All failures in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// The buyer information form collected in the first checkout stage.
///
/// Every field except `notes` is required. The RUT is kept in display
/// format while editing; `normalized_rut` produces the storage form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyerDraft {
    /// RUT in display format (dots and dash).
    pub rut: String,
    /// Full name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Shipping region.
    pub region: String,
    /// Shipping city.
    pub city: String,
    /// Shipping street address.
    pub address: String,
    /// Optional delivery notes.
    pub notes: String,
}

impl BuyerDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the RUT field, re-formatting as the user types.
    pub fn set_rut(&mut self, input: &str) {
        self.rut = rut::format(input);
    }

    /// Validate the whole form. All failures are reported together.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.rut.trim().is_empty() {
            errors.add("rut", "RUT is required");
        } else if !rut::validate(&self.rut) {
            errors.add("rut", "RUT is not valid");
        }

        for (field, value) in [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("region", &self.region),
            ("city", &self.city),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                errors.add(field, "This field is required");
            }
        }

        if !self.email.trim().is_empty() && !self.email.contains('@') {
            errors.add("email", "Email is not valid");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// RUT in storage form: no separators, uppercase check digit.
    pub fn normalized_rut(&self) -> String {
        rut::normalize(&self.rut)
    }

    /// Delivery notes, or None when the field was left blank.
    pub fn notes(&self) -> Option<&str> {
        let trimmed = self.notes.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BuyerDraft {
        let mut draft = BuyerDraft {
            full_name: "Ana Soto".to_string(),
            email: "ana@example.cl".to_string(),
            phone: "+56912345678".to_string(),
            region: "Metropolitana".to_string(),
            city: "Santiago".to_string(),
            address: "Av. Providencia 1234".to_string(),
            ..Default::default()
        };
        draft.set_rut("123456785");
        draft
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_set_rut_formats_live() {
        let mut draft = BuyerDraft::new();
        draft.set_rut("123456785");
        assert_eq!(draft.rut, "12.345.678-5");
        draft.set_rut("1234");
        assert_eq!(draft.rut, "123-4");
    }

    #[test]
    fn test_all_failures_reported_together() {
        let draft = BuyerDraft::new();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 7);
        assert!(errors.get("rut").is_some());
        assert!(errors.get("address").is_some());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let mut draft = filled();
        draft.rut = "12.345.678-9".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("rut"), Some("RUT is not valid"));
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut draft = filled();
        draft.email = "not-an-email".to_string();
        let errors = draft.validate().unwrap_err();
        assert!(errors.get("email").is_some());
    }

    #[test]
    fn test_normalized_rut() {
        let draft = filled();
        assert_eq!(draft.normalized_rut(), "123456785");
    }

    #[test]
    fn test_blank_notes_are_none() {
        let mut draft = filled();
        assert_eq!(draft.notes(), None);
        draft.notes = "  leave at reception  ".to_string();
        assert_eq!(draft.notes(), Some("leave at reception"));
    }
}
