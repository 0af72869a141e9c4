//! Login and signup form validation.

use crate::wire::SignupRequest;
use factcheck_domain::ValidationReport;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum password length
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("phone pattern is valid"));

fn check_credentials(report: &mut ValidationReport, email: &str, password: &str) {
    if email.trim().is_empty() {
        report.push("email", "Email is required");
    } else if !EMAIL_PATTERN.is_match(email) {
        report.push("email", "Please enter a valid email address");
    }

    if password.is_empty() {
        report.push("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_CHARS {
        report.push(
            "password",
            format!("Password must be at least {} characters long", MIN_PASSWORD_CHARS),
        );
    }
}

/// Login form contents
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

impl LoginForm {
    /// Validate email and password
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        check_credentials(&mut report, &self.email, &self.password);
        report
    }
}

/// Signup form contents
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number (ten digits)
    pub phone: String,
    /// Password
    pub password: String,
    /// Password again
    pub confirm_password: String,
}

impl SignupForm {
    /// Validate every field
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        if self.first_name.trim().is_empty() {
            report.push("firstName", "First name is required");
        }
        if self.last_name.trim().is_empty() {
            report.push("lastName", "Last name is required");
        }
        if self.phone.trim().is_empty() {
            report.push("phone", "Phone number is required");
        } else if !PHONE_PATTERN.is_match(self.phone.trim()) {
            report.push("phone", "Please enter a valid 10-digit phone number");
        }
        if self.password != self.confirm_password {
            report.push("confirmPassword", "Passwords do not match");
        }

        check_credentials(&mut report, &self.email, &self.password);
        report
    }

    /// Wire request for a validated form
    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
        }
    }
}
