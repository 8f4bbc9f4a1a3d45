//! Book listings and the marketplace visibility rule.
//!
//! A listing is published available and flips to sold exactly once, when a
//! purchase request for it completes. Sellers can revise descriptive fields
//! and the price until then.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ListingId, User, UserId, newest_first};

/// Default exclusive upper bound on listing prices.
pub const DEFAULT_PRICE_CEILING: u32 = 400;
/// Maximum length of the short descriptive fields.
pub const LISTING_TEXT_MAX: usize = 120;
/// Maximum length of a listing description.
pub const LISTING_DESCRIPTION_MAX: usize = 2000;
/// Maximum number of images attached to a listing.
pub const LISTING_IMAGES_MAX: usize = 8;

/// Validation errors for listing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidationError {
    EmptyField { field: &'static str },
    FieldTooLong { field: &'static str, max: usize },
    TooManyImages { max: usize },
    EmptyImage,
    PriceTooHigh { ceiling: u32 },
    NoChanges,
}

impl ListingValidationError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyField { field } | Self::FieldTooLong { field, .. } => Some(*field),
            Self::TooManyImages { .. } | Self::EmptyImage => Some("images"),
            Self::PriceTooHigh { .. } => Some("price"),
            Self::NoChanges => None,
        }
    }
}

impl fmt::Display for ListingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::TooManyImages { max } => write!(f, "a listing may carry at most {max} images"),
            Self::EmptyImage => write!(f, "image references must not be empty"),
            Self::PriceTooHigh { ceiling } => write!(f, "price must be below {ceiling}"),
            Self::NoChanges => write!(f, "update must change at least one field"),
        }
    }
}

impl std::error::Error for ListingValidationError {}

/// State errors raised when a listing can no longer change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStateError {
    AlreadySold { listing_id: ListingId },
}

impl fmt::Display for ListingStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySold { listing_id } => write!(f, "listing {listing_id} is already sold"),
        }
    }
}

impl std::error::Error for ListingStateError {}

fn required_text(field: &'static str, raw: &str) -> Result<String, ListingValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ListingValidationError::EmptyField { field });
    }
    bounded(field, trimmed, LISTING_TEXT_MAX)
}

fn optional_text(
    field: &'static str,
    raw: Option<&str>,
    max: usize,
) -> Result<Option<String>, ListingValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => bounded(field, value, max).map(Some),
    }
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, ListingValidationError> {
    if value.chars().count() > max {
        return Err(ListingValidationError::FieldTooLong { field, max });
    }
    Ok(value.to_owned())
}

fn image_list(raw: &[String]) -> Result<Vec<String>, ListingValidationError> {
    if raw.len() > LISTING_IMAGES_MAX {
        return Err(ListingValidationError::TooManyImages {
            max: LISTING_IMAGES_MAX,
        });
    }
    raw.iter()
        .map(|image| {
            let trimmed = image.trim();
            if trimmed.is_empty() {
                Err(ListingValidationError::EmptyImage)
            } else {
                Ok(trimmed.to_owned())
            }
        })
        .collect()
}

/// Price in whole currency units; zero marks a free donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    pub fn amount(self) -> u32 {
        self.0
    }

    pub fn is_donation(self) -> bool {
        self.0 == 0
    }
}

/// Marketplace rules configured at startup.
///
/// # Examples
/// ```
/// use bookshare::domain::ListingPolicy;
///
/// let policy = ListingPolicy::default();
/// assert!(policy.price(0).is_ok());
/// assert!(policy.price(399).is_ok());
/// assert!(policy.price(400).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPolicy {
    price_ceiling: u32,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_CEILING)
    }
}

impl ListingPolicy {
    pub fn new(price_ceiling: u32) -> Self {
        Self { price_ceiling }
    }

    pub fn price_ceiling(&self) -> u32 {
        self.price_ceiling
    }

    /// Validate an asking price against the ceiling.
    pub fn price(&self, amount: u32) -> Result<Price, ListingValidationError> {
        if amount >= self.price_ceiling {
            return Err(ListingValidationError::PriceTooHigh {
                ceiling: self.price_ceiling,
            });
        }
        Ok(Price(amount))
    }
}

/// Unvalidated descriptive fields for a new listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDetailsInput {
    pub title: String,
    pub author: String,
    pub category: String,
    pub language: String,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub images: Vec<String>,
}

/// Validated descriptive fields of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetails {
    title: String,
    author: String,
    category: String,
    language: String,
    condition: Option<String>,
    description: Option<String>,
    location: Option<String>,
    images: Vec<String>,
}

impl ListingDetails {
    pub fn try_new(input: &ListingDetailsInput) -> Result<Self, ListingValidationError> {
        Ok(Self {
            title: required_text("title", &input.title)?,
            author: required_text("author", &input.author)?,
            category: required_text("category", &input.category)?,
            language: required_text("language", &input.language)?,
            condition: optional_text("condition", input.condition.as_deref(), LISTING_TEXT_MAX)?,
            description: optional_text(
                "description",
                input.description.as_deref(),
                LISTING_DESCRIPTION_MAX,
            )?,
            location: optional_text("location", input.location.as_deref(), LISTING_TEXT_MAX)?,
            images: image_list(&input.images)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }
}

/// Unvalidated edits to a listing. `None` leaves a field unchanged; an
/// empty string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
    pub price: Option<u32>,
}

/// Validated edits ready to apply with [`Listing::revise`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingUpdate {
    title: Option<String>,
    author: Option<String>,
    category: Option<String>,
    language: Option<String>,
    condition: Option<Option<String>>,
    description: Option<Option<String>>,
    location: Option<Option<String>>,
    images: Option<Vec<String>>,
    price: Option<Price>,
}

impl ListingUpdate {
    pub fn try_from_changes(
        changes: &ListingChanges,
        policy: &ListingPolicy,
    ) -> Result<Self, ListingValidationError> {
        let required = |field: &'static str, value: &Option<String>| {
            value.as_deref().map(|raw| required_text(field, raw)).transpose()
        };
        let optional = |field: &'static str, value: &Option<String>, max: usize| {
            value
                .as_deref()
                .map(|raw| optional_text(field, Some(raw), max))
                .transpose()
        };
        let update = Self {
            title: required("title", &changes.title)?,
            author: required("author", &changes.author)?,
            category: required("category", &changes.category)?,
            language: required("language", &changes.language)?,
            condition: optional("condition", &changes.condition, LISTING_TEXT_MAX)?,
            description: optional("description", &changes.description, LISTING_DESCRIPTION_MAX)?,
            location: optional("location", &changes.location, LISTING_TEXT_MAX)?,
            images: changes.images.as_deref().map(image_list).transpose()?,
            price: changes.price.map(|amount| policy.price(amount)).transpose()?,
        };
        if update == Self::default() {
            return Err(ListingValidationError::NoChanges);
        }
        Ok(update)
    }
}

/// A book offered by a seller.
///
/// ## Invariants
/// - `is_available` goes from `true` to `false` once and never back.
/// - A sold listing cannot be revised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    id: ListingId,
    seller_id: UserId,
    #[serde(flatten)]
    details: ListingDetails,
    price: Price,
    is_available: bool,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Publish a new, available listing.
    pub fn publish(
        id: ListingId,
        seller_id: UserId,
        details: ListingDetails,
        price: Price,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            seller_id,
            details,
            price,
            is_available: true,
            created_at,
            updated_at: None,
        }
    }

    pub fn id(&self) -> &ListingId {
        &self.id
    }

    pub fn seller_id(&self) -> &UserId {
        &self.seller_id
    }

    pub fn details(&self) -> &ListingDetails {
        &self.details
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Mark the listing sold.
    pub fn mark_sold(self, at: DateTime<Utc>) -> Result<Self, ListingStateError> {
        if !self.is_available {
            return Err(ListingStateError::AlreadySold {
                listing_id: self.id,
            });
        }
        Ok(Self {
            is_available: false,
            updated_at: Some(at),
            ..self
        })
    }

    /// Apply seller edits.
    pub fn revise(self, update: ListingUpdate, at: DateTime<Utc>) -> Result<Self, ListingStateError> {
        if !self.is_available {
            return Err(ListingStateError::AlreadySold {
                listing_id: self.id,
            });
        }
        let ListingUpdate {
            title,
            author,
            category,
            language,
            condition,
            description,
            location,
            images,
            price,
        } = update;
        let current = self.details;
        let details = ListingDetails {
            title: title.unwrap_or(current.title),
            author: author.unwrap_or(current.author),
            category: category.unwrap_or(current.category),
            language: language.unwrap_or(current.language),
            condition: condition.unwrap_or(current.condition),
            description: description.unwrap_or(current.description),
            location: location.unwrap_or(current.location),
            images: images.unwrap_or(current.images),
        };
        Ok(Self {
            details,
            price: price.unwrap_or(self.price),
            updated_at: Some(at),
            ..self
        })
    }
}

/// Seller fields shown next to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub stars: u32,
    pub is_banned: bool,
}

impl From<&User> for SellerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            mobile: user.contact().mobile.to_string(),
            stars: user.reputation().stars(),
            is_banned: user.is_banned(),
        }
    }
}

/// A listing joined with its seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketplaceListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub seller: SellerSummary,
}

impl MarketplaceListing {
    pub fn new(listing: Listing, seller: &User) -> Self {
        Self {
            listing,
            seller: SellerSummary::from(seller),
        }
    }
}

/// Listings a buyer may see in the marketplace, newest first.
///
/// Keeps available listings whose seller exists and is not banned, dropping
/// those owned by `exclude` when supplied.
pub fn marketplace_view<S>(
    listings: Vec<Listing>,
    sellers: &HashMap<UserId, User, S>,
    exclude: Option<&UserId>,
) -> Vec<MarketplaceListing>
where
    S: std::hash::BuildHasher,
{
    let mut visible: Vec<MarketplaceListing> = listings
        .into_iter()
        .filter(|listing| listing.is_available())
        .filter(|listing| exclude != Some(listing.seller_id()))
        .filter_map(|listing| {
            let seller = sellers.get(listing.seller_id())?;
            (!seller.is_banned()).then(|| MarketplaceListing::new(listing, seller))
        })
        .collect();
    newest_first(&mut visible, |entry| entry.listing.created_at());
    visible
}
