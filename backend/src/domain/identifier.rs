//! UUID-backed identifiers for marketplace records.
//!
//! Every aggregate gets its own newtype so a listing id can never be handed
//! to a user lookup by mistake. All of them share one parsing contract:
//! the raw string must be non-empty, carry no surrounding whitespace and
//! parse as a UUID.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    Empty { label: &'static str },
    Invalid { label: &'static str },
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { label } => write!(f, "{label} must not be empty"),
            Self::Invalid { label } => write!(f, "{label} must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdentifierError {}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentifierError> {
                let raw = raw.as_ref();
                if raw.is_empty() {
                    return Err(IdentifierError::Empty { label: $label });
                }
                if raw.trim() != raw {
                    return Err(IdentifierError::Invalid { label: $label });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdentifierError::Invalid { label: $label })
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }
    };
}

uuid_identifier!(
    /// Stable user identifier.
    UserId,
    "user id"
);
uuid_identifier!(
    /// Identifier of a book listing.
    ListingId,
    "listing id"
);
uuid_identifier!(
    /// Identifier of a purchase request.
    TransactionId,
    "transaction id"
);
uuid_identifier!(
    /// Identifier of a help desk request.
    HelpRequestId,
    "help request id"
);
