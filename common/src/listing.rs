use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Owner id recorded for listings created without a signed-in identity.
pub const GUEST_OWNER_ID: &str = "guest";

/// Upper bound on the image list of a listing.
pub const MAX_IMAGES: usize = 10;

/// Opaque listing identifier, assigned by the document store on creation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(s: &str) -> Self {
        ListingId(s.to_string())
    }
}

/// Marketplace category of a listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Mobiles,
    Cars,
    Bikes,
    Home,
    Electronics,
    #[default]
    Others,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Mobiles,
            Category::Cars,
            Category::Bikes,
            Category::Home,
            Category::Electronics,
            Category::Others,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Mobiles => "Mobiles",
            Category::Cars => "Cars",
            Category::Bikes => "Bikes",
            Category::Home => "Home",
            Category::Electronics => "Electronics",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Physical condition of the item for sale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    New,
    #[default]
    Used,
}

impl Condition {
    pub fn all() -> &'static [Condition] {
        &[Condition::New, Condition::Used]
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::Used => "Used",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(Condition::New),
            "Used" => Ok(Condition::Used),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A selector value that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option: {0}")]
pub struct UnknownVariant(pub String);

/// A single classified ad as held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `None` when the stored value is missing or not a number.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub owner_id: String,
    #[serde(default)]
    pub seller_name: String,
    /// Phone number, digits only.
    #[serde(default)]
    pub seller_contact: String,
    /// Assigned by the store; `None` while a server timestamp is pending.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner_id == uid
    }

    /// Milliseconds since the epoch, missing timestamps count as 0.
    pub fn created_millis(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    /// Price used as a sort key, non-numeric counts as 0.
    pub fn price_key(&self) -> f64 {
        self.price.filter(|p| p.is_finite()).unwrap_or(0.0)
    }

    /// Apply an edit. Identity, owner and creation time are not reachable
    /// through a patch.
    pub fn apply_patch(&mut self, patch: &ListingPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = Some(price);
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(images) = &patch.images {
            self.images = images.clone();
        }
        if let Some(name) = &patch.seller_name {
            self.seller_name = name.clone();
        }
        if let Some(contact) = &patch.seller_contact {
            self.seller_contact = contact.clone();
        }
    }
}

/// A validated listing ready for insertion. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub condition: Condition,
    pub location: String,
    pub images: Vec<String>,
    pub owner_id: String,
    pub seller_name: String,
    pub seller_contact: String,
}

impl NewListing {
    pub fn into_listing(self, id: ListingId, created_at: DateTime<Utc>) -> Listing {
        Listing {
            id,
            title: self.title,
            description: self.description,
            price: Some(self.price),
            category: self.category,
            condition: self.condition,
            location: self.location,
            images: self.images,
            owner_id: self.owner_id,
            seller_name: self.seller_name,
            seller_contact: self.seller_contact,
            created_at: Some(created_at),
        }
    }
}

/// Partial update of the editable listing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_contact: Option<String>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        *self == ListingPatch::default()
    }
}

/// Stored prices are loosely typed: numbers, numeric strings or junk.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite()))
}
