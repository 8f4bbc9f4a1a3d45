//! User data model.
//!
//! Registration builds a [`User`] from validated value types. Profile edits
//! go through [`ProfileUpdate`], which can only touch the name and contact
//! fields; reputation is owned by the settlement flow.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use super::{Reputation, UserId};

/// Maximum length of a user's name.
pub const USER_NAME_MAX: usize = 64;
/// Maximum length of a state or district name.
pub const REGION_NAME_MAX: usize = 64;
/// Minimum number of digits in a mobile number.
pub const MOBILE_DIGITS_MIN: usize = 7;
/// Maximum number of digits in a mobile number.
pub const MOBILE_DIGITS_MAX: usize = 15;

/// Validation errors for user value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong { max: usize },
    InvalidEmail,
    InvalidMobile,
    EmptyRegion { field: &'static str },
    RegionTooLong { field: &'static str, max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must look like name@example.org"),
            Self::InvalidMobile => write!(
                f,
                "mobile must contain {MOBILE_DIGITS_MIN} to {MOBILE_DIGITS_MAX} digits"
            ),
            Self::EmptyRegion { field } => write!(f, "{field} must not be empty"),
            Self::RegionTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl UserValidationError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::InvalidEmail => "email",
            Self::InvalidMobile => "mobile",
            Self::EmptyRegion { field } | Self::RegionTooLong { field, .. } => *field,
        }
    }
}

macro_rules! string_value {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }
    };
}

/// Display name of a user, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_value!(UserName);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address, trimmed and stored lowercase.
///
/// # Examples
/// ```
/// use bookshare::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Reader@Example.ORG ").expect("valid email");
/// assert_eq!(email.as_ref(), "reader@example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

string_value!(EmailAddress);

/// Mobile number as entered, trimmed.
///
/// Spaces and dashes are ignored when counting digits; a single leading `+`
/// is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let mut digits = 0_usize;
        for ch in body.chars() {
            match ch {
                '0'..='9' => digits += 1,
                ' ' | '-' => {}
                _ => return Err(UserValidationError::InvalidMobile),
            }
        }
        if !(MOBILE_DIGITS_MIN..=MOBILE_DIGITS_MAX).contains(&digits) {
            return Err(UserValidationError::InvalidMobile);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_value!(MobileNumber);

/// State or district name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionName(String);

impl RegionName {
    /// Validate a region; `field` names the payload field for error messages.
    pub fn new(field: &'static str, raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyRegion { field });
        }
        if trimmed.chars().count() > REGION_NAME_MAX {
            return Err(UserValidationError::RegionTooLong {
                field,
                max: REGION_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_value!(RegionName);

/// How buyers reach a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub mobile: MobileNumber,
    pub state: RegionName,
    pub district: RegionName,
}

/// Opaque password digest produced by a password hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validated fields of a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub contact: ContactDetails,
}

/// Marketplace participant.
///
/// ## Invariants
/// - `email` is unique across users (enforced by the repository).
/// - `reputation` changes only through transaction settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    contact: ContactDetails,
    password_hash: PasswordHash,
    reputation: Reputation,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly registered user with an empty reputation.
    pub fn register(
        id: UserId,
        details: NewUser,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        let NewUser {
            name,
            email,
            contact,
        } = details;
        Self {
            id,
            name,
            email,
            contact,
            password_hash,
            reputation: Reputation::default(),
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn reputation(&self) -> &Reputation {
        &self.reputation
    }

    pub fn is_banned(&self) -> bool {
        self.reputation.is_banned()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the reputation wholesale.
    ///
    /// Used by settlement and when rehydrating stored users.
    #[must_use]
    pub fn with_reputation(self, reputation: Reputation) -> Self {
        Self { reputation, ..self }
    }

    /// Apply a profile edit, leaving credentials and reputation untouched.
    #[must_use]
    pub fn with_profile_update(self, update: ProfileUpdate) -> Self {
        let ProfileUpdate {
            name,
            mobile,
            state,
            district,
        } = update;
        Self {
            name: name.unwrap_or(self.name),
            contact: ContactDetails {
                mobile: mobile.unwrap_or(self.contact.mobile),
                state: state.unwrap_or(self.contact.state),
                district: district.unwrap_or(self.contact.district),
            },
            ..self
        }
    }
}

/// The only user fields a profile edit may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<UserName>,
    pub mobile: Option<MobileNumber>,
    pub state: Option<RegionName>,
    pub district: Option<RegionName>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.mobile.is_none()
            && self.state.is_none()
            && self.district.is_none()
    }
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub state: String,
    pub district: String,
    pub stars: u32,
    pub rejections: u32,
    pub is_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.to_string(),
            email: user.email.to_string(),
            mobile: user.contact.mobile.to_string(),
            state: user.contact.state.to_string(),
            district: user.contact.district.to_string(),
            stars: user.reputation.stars(),
            rejections: user.reputation.rejections(),
            is_banned: user.reputation.is_banned(),
            banned_at: user.reputation.banned_at(),
            created_at: user.created_at,
        }
    }
}
