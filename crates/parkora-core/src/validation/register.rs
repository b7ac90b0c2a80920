//! Partner registration rules.

use std::borrow::Cow;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use super::FieldErrors;
use crate::models::RegisterPartnerForm;

const MAX_EMAIL_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 6;
const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=100;

fn error_with(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_email_field(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(error_with("required", "Email is required"));
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(error_with(
            "length",
            "Email must not exceed 255 characters",
        ));
    }
    if !email.validate_email() {
        return Err(error_with("email", "Email should be valid"));
    }
    Ok(())
}

pub fn validate_password_field(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(error_with("required", "Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(error_with(
            "length",
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

/// Blank usernames are dropped from the request, so only a typed one is checked.
pub fn validate_username_field(username: &str) -> Result<(), ValidationError> {
    let username = username.trim();
    if !username.is_empty() && !USERNAME_LENGTH.contains(&username.chars().count()) {
        return Err(error_with(
            "length",
            "Username must be between 3 and 100 characters",
        ));
    }
    Ok(())
}

fn required_within(
    value: &str,
    max: usize,
    required: &'static str,
    too_long: &'static str,
) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(error_with("required", required));
    }
    if value.chars().count() > max {
        return Err(error_with("length", too_long));
    }
    Ok(())
}

pub fn validate_company_name(value: &str) -> Result<(), ValidationError> {
    required_within(
        value,
        255,
        "Company name is required",
        "Company name must not exceed 255 characters",
    )
}

pub fn validate_business_registration_number(value: &str) -> Result<(), ValidationError> {
    required_within(
        value,
        100,
        "Business registration number is required",
        "Business registration number must not exceed 100 characters",
    )
}

pub fn validate_tax_identification_number(value: &str) -> Result<(), ValidationError> {
    required_within(
        value,
        50,
        "Tax identification number is required",
        "Tax identification number must not exceed 50 characters",
    )
}

fn collect(result: Result<(), ValidationErrors>, errors: &mut FieldErrors) {
    let Err(validation) = result else {
        return;
    };
    for (field, field_errors) in validation.field_errors() {
        let message = field_errors
            .first()
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{} is invalid", field));
        errors.insert(field.to_string(), message);
    }
}

fn is_all_digits(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Validate a registration form. An empty map means the form may be sent.
pub fn validate_registration(form: &RegisterPartnerForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    collect(form.validate(), &mut errors);
    collect(form.company.validate(), &mut errors);

    if let Some(Err(e)) = form.username.as_deref().map(validate_username_field) {
        if let Some(message) = e.message {
            errors.insert("username".to_string(), message.to_string());
        }
    }

    if form.password != form.confirm_password {
        errors.insert(
            "confirm_password".to_string(),
            "Passwords do not match".to_string(),
        );
    }
    if form.first_name.as_deref().is_some_and(is_all_digits) {
        errors
            .entry("first_name".to_string())
            .or_insert_with(|| "First name cannot be all numbers".to_string());
    }
    if form.last_name.as_deref().is_some_and(is_all_digits) {
        errors
            .entry("last_name".to_string())
            .or_insert_with(|| "Last name cannot be all numbers".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompanyInfo;

    fn valid_company() -> CompanyInfo {
        CompanyInfo {
            company_name: "Test Company".to_string(),
            business_registration_number: "BR123456".to_string(),
            tax_identification_number: "TAX123".to_string(),
            ..Default::default()
        }
    }

    fn valid_form() -> RegisterPartnerForm {
        RegisterPartnerForm {
            username: None,
            email: "partner@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            first_name: Some("Ana".to_string()),
            last_name: Some("Silva".to_string()),
            phone: Some("+15551234567".to_string()),
            company: valid_company(),
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate_registration(&valid_form()).is_empty());
    }

    #[test]
    fn test_required_email_and_password() {
        let form = RegisterPartnerForm {
            email: "  ".to_string(),
            password: String::new(),
            confirm_password: String::new(),
            ..valid_form()
        };
        let errors = validate_registration(&form);
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["password"], "Password is required");
    }

    #[test]
    fn test_invalid_email_and_short_password() {
        let form = RegisterPartnerForm {
            email: "not-an-email".to_string(),
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
            ..valid_form()
        };
        let errors = validate_registration(&form);
        assert_eq!(errors["email"], "Email should be valid");
        assert_eq!(errors["password"], "Password must be at least 6 characters");
    }

    #[test]
    fn test_password_mismatch() {
        let form = RegisterPartnerForm {
            confirm_password: "secret2".to_string(),
            ..valid_form()
        };
        let errors = validate_registration(&form);
        assert_eq!(errors["confirm_password"], "Passwords do not match");
    }

    #[test]
    fn test_numeric_names_and_long_phone() {
        let form = RegisterPartnerForm {
            first_name: Some("12345".to_string()),
            last_name: Some(" 987 ".to_string()),
            phone: Some("+1234567890123".to_string()),
            ..valid_form()
        };
        let errors = validate_registration(&form);
        assert_eq!(errors["first_name"], "First name cannot be all numbers");
        assert_eq!(errors["last_name"], "Last name cannot be all numbers");
        assert_eq!(errors["phone"], "Phone must not exceed 13 characters");
    }

    #[test]
    fn test_username_length_bounds() {
        for ok in ["abc".to_string(), "a".repeat(100)] {
            let form = RegisterPartnerForm {
                username: Some(ok.clone()),
                ..valid_form()
            };
            assert!(validate_registration(&form).is_empty(), "{}", ok.len());
        }
        for bad in ["ab".to_string(), "a".repeat(101)] {
            let form = RegisterPartnerForm {
                username: Some(bad),
                ..valid_form()
            };
            assert_eq!(
                validate_registration(&form)["username"],
                "Username must be between 3 and 100 characters"
            );
        }
        let blank = RegisterPartnerForm {
            username: Some(String::new()),
            ..valid_form()
        };
        assert!(validate_registration(&blank).is_empty());
    }

    #[test]
    fn test_company_required_fields() {
        let form = RegisterPartnerForm {
            company: CompanyInfo::default(),
            ..valid_form()
        };
        let errors = validate_registration(&form);
        assert_eq!(errors["company_name"], "Company name is required");
        assert_eq!(
            errors["business_registration_number"],
            "Business registration number is required"
        );
        assert_eq!(
            errors["tax_identification_number"],
            "Tax identification number is required"
        );
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_company_maximum_lengths() {
        let form = RegisterPartnerForm {
            company: CompanyInfo {
                company_name: "A".repeat(256),
                business_registration_number: "B".repeat(101),
                tax_identification_number: "T".repeat(51),
                business_type: Some("L".repeat(51)),
                address_line1: Some("1".repeat(256)),
                address_line2: Some("2".repeat(256)),
                city: Some("C".repeat(101)),
                state: Some("S".repeat(101)),
                province: Some("P".repeat(101)),
                postal_code: Some("9".repeat(21)),
                country: Some("K".repeat(101)),
            },
            ..valid_form()
        };
        let errors = validate_registration(&form);
        let expected = [
            ("company_name", "Company name must not exceed 255 characters"),
            (
                "business_registration_number",
                "Business registration number must not exceed 100 characters",
            ),
            (
                "tax_identification_number",
                "Tax identification number must not exceed 50 characters",
            ),
            ("business_type", "Business type must not exceed 50 characters"),
            ("address_line1", "Address line 1 must not exceed 255 characters"),
            ("address_line2", "Address line 2 must not exceed 255 characters"),
            ("city", "City must not exceed 100 characters"),
            ("state", "State must not exceed 100 characters"),
            ("province", "Province must not exceed 100 characters"),
            ("postal_code", "Postal code must not exceed 20 characters"),
            ("country", "Country must not exceed 100 characters"),
        ];
        for (field, message) in expected {
            assert_eq!(errors[field], message, "{}", field);
        }
        assert_eq!(errors.len(), expected.len());
    }

    #[test]
    fn test_company_fields_at_their_limits_pass() {
        let form = RegisterPartnerForm {
            company: CompanyInfo {
                company_name: "A".repeat(255),
                business_registration_number: "B".repeat(100),
                tax_identification_number: "T".repeat(50),
                postal_code: Some("9".repeat(20)),
                address_line1: Some(String::new()),
                ..Default::default()
            },
            ..valid_form()
        };
        assert!(validate_registration(&form).is_empty());
    }
}
