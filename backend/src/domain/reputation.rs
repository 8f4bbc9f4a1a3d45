//! Seller reputation policy.
//!
//! Stars move by one per settled transaction and never drop below zero.
//! Rejections only ever grow; reaching [`BAN_THRESHOLD`] bans the seller
//! permanently and records when that happened.

use std::fmt;

use chrono::{DateTime, Utc};

/// Rejection count at which a seller is banned.
pub const BAN_THRESHOLD: u32 = 5;

/// Raised when stored reputation values contradict the ban rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReputationError {
    /// Enough rejections to be banned but no ban recorded.
    MissingBan { rejections: u32 },
    /// A ban recorded below the threshold.
    PrematureBan { rejections: u32 },
}

impl fmt::Display for ReputationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBan { rejections } => write!(
                f,
                "seller with {rejections} rejections must be banned (threshold {BAN_THRESHOLD})"
            ),
            Self::PrematureBan { rejections } => write!(
                f,
                "seller with {rejections} rejections cannot be banned before {BAN_THRESHOLD}"
            ),
        }
    }
}

impl std::error::Error for ReputationError {}

/// Stars, rejections and ban state of a seller.
///
/// ## Invariants
/// - `banned_at` is set exactly when `rejections >= BAN_THRESHOLD`.
/// - Once set, `banned_at` never changes.
///
/// # Examples
/// ```
/// use bookshare::domain::{BAN_THRESHOLD, Reputation};
/// use chrono::Utc;
///
/// let mut reputation = Reputation::default().after_completed_sale();
/// for _ in 0..BAN_THRESHOLD {
///     reputation = reputation.after_rejection(Utc::now());
/// }
/// assert!(reputation.is_banned());
/// assert_eq!(reputation.stars(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reputation {
    stars: u32,
    rejections: u32,
    banned_at: Option<DateTime<Utc>>,
}

impl Reputation {
    /// Rebuild a reputation from stored values, enforcing the ban rule.
    pub fn from_parts(
        stars: u32,
        rejections: u32,
        banned_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ReputationError> {
        match (rejections >= BAN_THRESHOLD, banned_at.is_some()) {
            (true, false) => Err(ReputationError::MissingBan { rejections }),
            (false, true) => Err(ReputationError::PrematureBan { rejections }),
            _ => Ok(Self {
                stars,
                rejections,
                banned_at,
            }),
        }
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    pub fn is_banned(&self) -> bool {
        self.banned_at.is_some()
    }

    /// When the ban took effect.
    pub fn banned_at(&self) -> Option<DateTime<Utc>> {
        self.banned_at
    }

    /// Reputation after a buyer's request was completed.
    #[must_use]
    pub fn after_completed_sale(self) -> Self {
        Self {
            stars: self.stars.saturating_add(1),
            ..self
        }
    }

    /// Reputation after a request was rejected at `at`.
    #[must_use]
    pub fn after_rejection(self, at: DateTime<Utc>) -> Self {
        let rejections = self.rejections.saturating_add(1);
        let banned_at = self
            .banned_at
            .or_else(|| (rejections >= BAN_THRESHOLD).then_some(at));
        Self {
            stars: self.stars.saturating_sub(1),
            rejections,
            banned_at,
        }
    }
}
