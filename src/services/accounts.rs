//! Request shapes and checks shared by the user and artist stores.

use crate::entities::types::{Address, AddressInput};
use crate::errors::ServiceError;
use crate::validation::{is_valid_artist_phone, is_valid_email, is_valid_phone, non_blank};
use serde::{Deserialize, Serialize};

/// Which phone format an account type accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhoneRule {
    /// Any ten digits.
    TenDigits,
    /// Ten digits starting with 6-9.
    Mobile,
}

impl PhoneRule {
    pub fn accepts(&self, phone: &str) -> bool {
        match self {
            Self::TenDigits => is_valid_phone(phone),
            Self::Mobile => is_valid_artist_phone(phone),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::TenDigits => "Phone number must be exactly 10 digits",
            Self::Mobile => "Invalid phone number. It should be 10 digits and start with 6-9.",
        }
    }

    pub fn check(&self, phone: &str) -> Result<(), ServiceError> {
        if self.accepts(phone) {
            Ok(())
        } else {
            Err(ServiceError::InvalidFormat(self.message().to_string()))
        }
    }
}

pub fn check_email(email: &str) -> Result<(), ServiceError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ServiceError::InvalidFormat("Invalid email format".to_string()))
    }
}

/// Registration body for either account type. `bio` is ignored for users.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterAccount {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub address: Option<AddressInput>,
}

/// A registration that passed every format check. The password is still plain.
#[derive(Clone, Debug)]
pub struct ValidatedAccount {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub address: Address,
}

impl RegisterAccount {
    /// Email is checked before phone; missing fields are reported first.
    pub fn validate(self, rule: PhoneRule) -> Result<ValidatedAccount, ServiceError> {
        let name = non_blank(self.name).ok_or(ServiceError::MissingField)?;
        let email = non_blank(self.email).ok_or(ServiceError::MissingField)?;
        let phone = non_blank(self.phone).ok_or(ServiceError::MissingField)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ServiceError::MissingField)?;
        let address = self
            .address
            .and_then(AddressInput::into_address)
            .ok_or(ServiceError::MissingField)?;

        check_email(&email)?;
        rule.check(&phone)?;

        Ok(ValidatedAccount {
            name,
            email,
            phone,
            password,
            bio: non_blank(self.bio),
            profile_image: non_blank(self.profile_image),
            address,
        })
    }
}

/// Login body: one identifier that may be either the email or the phone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_phone: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn into_parts(self) -> Result<(String, String), ServiceError> {
        let identifier = non_blank(self.email_or_phone).ok_or(ServiceError::MissingField)?;
        let password = self.password.ok_or(ServiceError::MissingField)?;
        Ok((identifier, password))
    }
}

/// A signed token plus the public profile of the account that logged in.
#[derive(Clone, Debug, Serialize)]
pub struct LoginOutcome<P> {
    pub token: String,
    pub profile: P,
}

/// Validates an optional address update.
pub fn updated_address(input: Option<AddressInput>) -> Result<Option<Address>, ServiceError> {
    match input {
        None => Ok(None),
        Some(input) => input.into_address().map(Some).ok_or_else(|| {
            ServiceError::ValidationError("Address requires state, pin and country".to_string())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn asha() -> RegisterAccount {
        RegisterAccount {
            name: Some("Asha".into()),
            email: Some("a@x.com".into()),
            phone: Some("9123456789".into()),
            password: Some("pw".into()),
            bio: Some("Watercolours".into()),
            profile_image: None,
            address: Some(AddressInput {
                street: None,
                state: Some("Kerala".into()),
                pin: Some("682001".into()),
                country: Some("India".into()),
            }),
        }
    }

    #[test]
    fn valid_registration_passes() {
        let account = asha().validate(PhoneRule::Mobile).unwrap();
        assert_eq!(account.email, "a@x.com");
        assert_eq!(account.bio.as_deref(), Some("Watercolours"));
        assert_eq!(account.address.state, "Kerala");
    }

    #[test]
    fn email_is_checked_before_phone() {
        let mut request = asha();
        request.email = Some("not-an-email".into());
        request.phone = Some("123".into());
        assert_matches!(
            request.validate(PhoneRule::TenDigits),
            Err(ServiceError::InvalidFormat(msg)) if msg == "Invalid email format"
        );
    }

    #[test]
    fn phone_rules_have_distinct_messages() {
        let mut request = asha();
        request.phone = Some("1234567890".into());
        assert!(request.clone().validate(PhoneRule::TenDigits).is_ok());
        assert_matches!(
            request.validate(PhoneRule::Mobile),
            Err(ServiceError::InvalidFormat(msg)) if msg.starts_with("Invalid phone number")
        );
    }

    #[test]
    fn missing_address_is_a_missing_field() {
        let mut request = asha();
        request.address = None;
        assert_matches!(
            request.validate(PhoneRule::Mobile),
            Err(ServiceError::MissingField)
        );
    }

    #[test]
    fn login_requires_both_parts() {
        let request = LoginRequest {
            email_or_phone: Some("9123456789".into()),
            password: None,
        };
        assert_matches!(request.into_parts(), Err(ServiceError::MissingField));
    }

    #[test]
    fn partial_address_update_is_rejected() {
        let input = AddressInput {
            state: Some("Goa".into()),
            ..Default::default()
        };
        assert_matches!(
            updated_address(Some(input)),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(updated_address(None), Ok(None));
    }
}
