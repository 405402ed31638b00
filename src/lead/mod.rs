//! Lead capture form
//!
//! Stateless: a submission is validated, logged and acknowledged.
//! Nothing is stored.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex");
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9 ()./-]{7,20}$").expect("valid regex");
}

/// A contact form submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeadRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub message: String,
}

/// Acknowledgement returned to the form
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeadResponse {
    pub success: bool,
    pub message: String,
}

impl LeadResponse {
    fn accepted(name: &str) -> Self {
        Self {
            success: true,
            message: format!(
                "Thanks {}! An admissions advisor will contact you within one business day.",
                name
            ),
        }
    }

    pub fn rejected(errors: &[String]) -> Self {
        Self {
            success: false,
            message: errors.join("; "),
        }
    }
}

impl LeadRequest {
    /// Collect every validation problem; empty when the lead is acceptable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !EMAIL_RE.is_match(email) {
            errors.push("Email address is not valid".to_string());
        }
        let phone = self.phone.trim();
        if !phone.is_empty() && !PHONE_RE.is_match(phone) {
            errors.push("Phone number is not valid".to_string());
        }
        if self.message.chars().count() > 5000 {
            errors.push("Message is too long".to_string());
        }

        errors
    }
}

/// Validate and acknowledge a submission
pub fn submit(lead: &LeadRequest) -> LeadResponse {
    let errors = lead.validate();
    if !errors.is_empty() {
        tracing::debug!("Rejected lead: {:?}", errors);
        return LeadResponse::rejected(&errors);
    }

    tracing::info!(
        course = %lead.course.trim(),
        has_phone = !lead.phone.trim().is_empty(),
        "Lead received"
    );
    LeadResponse::accepted(lead.name.trim())
}
