//! Session user and the forms that create or change it.

use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, UserId};
use crate::validation::{ValidationError, require};

/// Display name given to users created by login (identity is not verified).
pub const SYNTHESIZED_NAME: &str = "John Doe";
/// Company name given to users created by login.
pub const SYNTHESIZED_COMPANY: &str = "Demo Store";
/// Business category given to users created by login.
pub const SYNTHESIZED_CATEGORY: &str = "Kirana";

/// The currently signed-in user.
///
/// This is also the shape of the persisted session record, hence the
/// camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub company_name: String,
    pub business_category: String,
}

impl User {
    /// Build the stand-in identity returned by login.
    #[must_use]
    pub fn synthesized(id: UserId, email: Email, role: Role) -> Self {
        Self {
            id,
            name: SYNTHESIZED_NAME.to_owned(),
            email,
            role,
            company_name: SYNTHESIZED_COMPANY.to_owned(),
            business_category: SYNTHESIZED_CATEGORY.to_owned(),
        }
    }

    /// Build a store owner from validated signup details.
    ///
    /// Signups always become [`Role::Admin`].
    #[must_use]
    pub fn from_signup(id: UserId, signup: ValidSignup) -> Self {
        Self {
            id,
            name: signup.name,
            email: signup.email,
            role: Role::Admin,
            company_name: signup.company_name,
            business_category: signup.business_category,
        }
    }

    /// Apply a validated profile update.
    pub fn apply_profile(&mut self, profile: ValidProfile) {
        self.name = profile.name;
        self.email = profile.email;
        self.company_name = profile.company_name;
        if let Some(category) = profile.business_category {
            self.business_category = category;
        }
    }
}

/// Validated login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: Email,
    pub role: Role,
}

/// Validate the login form: email, password, and role are all required.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first missing or malformed field.
pub fn validate_login(email: &str, password: &str, role: &str) -> Result<LoginInput, ValidationError> {
    let email = parse_email(email)?;
    require("password", password)?;
    let role = require("role", role)?
        .parse::<Role>()
        .map_err(|e| ValidationError::invalid("role", e))?;
    Ok(LoginInput { email, role })
}

/// Signup form fields other than the password.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub business_category: String,
}

/// Signup details after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub company_name: String,
    pub business_category: String,
}

impl SignupDetails {
    /// Every signup field, the password included, must be non-blank.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first blank or malformed field.
    pub fn validate(&self, password: &str) -> Result<ValidSignup, ValidationError> {
        let name = require("name", &self.name)?.to_owned();
        let email = parse_email(&self.email)?;
        require("password", password)?;
        let phone = require("phone", &self.phone)?.to_owned();
        let company_name = require("companyName", &self.company_name)?.to_owned();
        let business_category = require("businessCategory", &self.business_category)?.to_owned();

        Ok(ValidSignup {
            name,
            email,
            phone,
            company_name,
            business_category,
        })
    }
}

/// Profile fields editable from the settings page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub business_category: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
}

/// Profile update after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProfile {
    pub name: String,
    pub email: Email,
    pub company_name: String,
    pub business_category: Option<String>,
}

impl ProfileUpdate {
    /// Name, email, and company name are required; the rest is optional.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first missing or malformed field.
    pub fn validate(&self) -> Result<ValidProfile, ValidationError> {
        let name = require("name", &self.name)?.to_owned();
        let email = parse_email(&self.email)?;
        let company_name = require("companyName", &self.company_name)?.to_owned();
        let business_category = self
            .business_category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);

        Ok(ValidProfile {
            name,
            email,
            company_name,
            business_category,
        })
    }
}

fn parse_email(raw: &str) -> Result<Email, ValidationError> {
    let raw = require("email", raw)?;
    Email::parse(raw).map_err(|e| ValidationError::invalid("email", e.to_string()))
}
