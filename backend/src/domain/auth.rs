//! Credentials for login and registration.
//!
//! Inbound adapters hand raw strings to these constructors so handlers never
//! pass unvalidated payloads to a port. Password material is wrapped in
//! [`Zeroizing`] and wiped when dropped.

use std::fmt;

use zeroize::Zeroizing;

use super::{
    ContactDetails, EmailAddress, MobileNumber, NewUser, RegionName, UserName,
    UserValidationError,
};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    EmptyEmail,
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// The email is trimmed and lowercased but not checked for shape; a
/// malformed address simply fails to authenticate.
///
/// # Examples
/// ```
/// use bookshare::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Reader@Example.org", "hunter22").unwrap();
/// assert_eq!(creds.email(), "reader@example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation errors for a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    Field(UserValidationError),
    PasswordTooShort { min: usize },
}

impl RegistrationValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Field(inner) => inner.field(),
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(inner) => inner.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Field(value)
    }
}

/// Raw registration fields as received from a client.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationParts<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub mobile: &'a str,
    pub state: &'a str,
    pub district: &'a str,
}

/// A validated registration request awaiting password hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    details: NewUser,
    password: Zeroizing<String>,
}

impl Registration {
    pub fn try_from_parts(
        parts: RegistrationParts<'_>,
    ) -> Result<Self, RegistrationValidationError> {
        let details = NewUser {
            name: UserName::new(parts.name)?,
            email: EmailAddress::new(parts.email)?,
            contact: ContactDetails {
                mobile: MobileNumber::new(parts.mobile)?,
                state: RegionName::new("state", parts.state)?,
                district: RegionName::new("district", parts.district)?,
            },
        };
        if parts.password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(Self {
            details,
            password: Zeroizing::new(parts.password.to_owned()),
        })
    }

    pub fn details(&self) -> &NewUser {
        &self.details
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Split into the account details, dropping the password.
    pub fn into_details(self) -> NewUser {
        self.details
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn parts() -> RegistrationParts<'static> {
        RegistrationParts {
            name: "Ravi",
            email: "ravi@example.org",
            password: "correct horse",
            mobile: "9876543210",
            state: "Goa",
            district: "North Goa",
        }
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("a@b.c", "", LoginValidationError::EmptyPassword)]
    fn login_rejects_blank_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        assert_eq!(
            LoginCredentials::try_from_parts(email, password),
            Err(expected)
        );
    }

    #[rstest]
    fn login_keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("a@b.c", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn registration_accepts_valid_parts(parts: RegistrationParts<'static>) {
        let registration = Registration::try_from_parts(parts).expect("valid");
        assert_eq!(registration.details().email.as_ref(), "ravi@example.org");
        assert_eq!(registration.password(), "correct horse");
    }

    #[rstest]
    fn registration_rejects_short_password(parts: RegistrationParts<'static>) {
        let err = Registration::try_from_parts(RegistrationParts {
            password: "short",
            ..parts
        })
        .expect_err("too short");
        assert_eq!(err.field(), "password");
    }

    #[rstest]
    fn registration_reports_offending_field(parts: RegistrationParts<'static>) {
        let err = Registration::try_from_parts(RegistrationParts {
            mobile: "12",
            ..parts
        })
        .expect_err("bad mobile");
        assert_eq!(err.field(), "mobile");
    }
}
