use serde::{Deserialize, Serialize};
use validator::Validate;

use super::envelope::ApiResponse;
use crate::validation::register::{
    validate_business_registration_number, validate_company_name, validate_email_field,
    validate_password_field, validate_tax_identification_number,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login and registration answer with the token (or nothing) in `data`.
pub type TokenResponse = ApiResponse<Option<String>>;

/// Partner registration form as entered by the user.
#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterPartnerForm {
    pub username: Option<String>,
    #[validate(custom(function = "validate_email_field"))]
    pub email: String,
    #[validate(custom(function = "validate_password_field"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(max = 100, message = "First name must not exceed 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must not exceed 100 characters"))]
    pub last_name: Option<String>,
    #[validate(length(max = 13, message = "Phone must not exceed 13 characters"))]
    pub phone: Option<String>,
    pub company: CompanyInfo,
}

/// Company section of the registration form. Serialized flat into the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[validate(custom(function = "validate_company_name"))]
    pub company_name: String,
    #[validate(custom(function = "validate_business_registration_number"))]
    pub business_registration_number: String,
    #[validate(custom(function = "validate_tax_identification_number"))]
    pub tax_identification_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Business type must not exceed 50 characters"))]
    pub business_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255, message = "Address line 1 must not exceed 255 characters"))]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255, message = "Address line 2 must not exceed 255 characters"))]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "City must not exceed 100 characters"))]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "State must not exceed 100 characters"))]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Province must not exceed 100 characters"))]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20, message = "Postal code must not exceed 20 characters"))]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Country must not exceed 100 characters"))]
    pub country: Option<String>,
}

impl CompanyInfo {
    /// Trimmed copy with blank optional fields dropped.
    pub fn normalized(&self) -> Self {
        Self {
            company_name: self.company_name.trim().to_string(),
            business_registration_number: self.business_registration_number.trim().to_string(),
            tax_identification_number: self.tax_identification_number.trim().to_string(),
            business_type: non_blank(&self.business_type),
            address_line1: non_blank(&self.address_line1),
            address_line2: non_blank(&self.address_line2),
            city: non_blank(&self.city),
            state: non_blank(&self.state),
            province: non_blank(&self.province),
            postal_code: non_blank(&self.postal_code),
            country: non_blank(&self.country),
        }
    }
}

/// Body of `POST /auth/register/partners`. Blank optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPartnerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub company: CompanyInfo,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl From<&RegisterPartnerForm> for RegisterPartnerRequest {
    fn from(form: &RegisterPartnerForm) -> Self {
        Self {
            username: non_blank(&form.username),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            first_name: non_blank(&form.first_name),
            last_name: non_blank(&form.last_name),
            phone: non_blank(&form.phone),
            company: form.company.normalized(),
        }
    }
}
