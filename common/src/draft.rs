use serde::{Deserialize, Serialize};

use crate::listing::{Category, Condition, Listing, ListingPatch, NewListing, MAX_IMAGES};
use crate::session::Owner;

/// Rejected form input. Raised before anything is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Price must be greater than 0")]
    InvalidPrice,
    #[error("City/Location is required")]
    MissingLocation,
    #[error("Add at least one image URL")]
    NoImages,
    #[error("Invalid WhatsApp number")]
    InvalidContact,
}

/// Raw text of the create/edit form, exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: Category,
    pub condition: Condition,
    pub location: String,
    /// Image URLs separated by commas or newlines.
    pub image_urls: String,
    pub seller_name: String,
    pub seller_contact: String,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: String::new(),
            category: Category::Mobiles,
            condition: Condition::Used,
            location: String::new(),
            image_urls: String::new(),
            seller_name: String::new(),
            seller_contact: String::new(),
        }
    }
}

/// Draft fields after validation, independent of create vs edit.
#[derive(Debug, Clone, PartialEq)]
struct Checked {
    title: String,
    description: String,
    price: f64,
    location: String,
    images: Vec<String>,
    seller_name: String,
    seller_contact: String,
}

impl ListingDraft {
    /// Prefill the edit form from a stored listing.
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price.map(|p| p.to_string()).unwrap_or_default(),
            category: listing.category,
            condition: listing.condition,
            location: listing.location.clone(),
            image_urls: listing.images.join("\n"),
            seller_name: listing.seller_name.clone(),
            seller_contact: listing.seller_contact.clone(),
        }
    }

    /// Parsed image list, as shown in the preview strip.
    pub fn images(&self) -> Vec<String> {
        parse_image_urls(&self.image_urls)
    }

    /// Drop one URL from the list (preview "×" button).
    pub fn remove_image(&mut self, url: &str) {
        let kept: Vec<String> = self.images().into_iter().filter(|u| u != url).collect();
        self.image_urls = kept.join("\n");
    }

    /// First failing rule, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.check().map(|_| ())
    }

    fn check(&self) -> Result<Checked, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or(ValidationError::InvalidPrice)?;
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ValidationError::MissingLocation);
        }
        let images = self.images();
        if images.is_empty() {
            return Err(ValidationError::NoImages);
        }
        let contact = only_digits(&self.seller_contact);
        if !contact.is_empty() && !(10..=13).contains(&contact.len()) {
            return Err(ValidationError::InvalidContact);
        }

        Ok(Checked {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            price,
            location: location.to_string(),
            images,
            seller_name: self.seller_name.trim().to_string(),
            seller_contact: contact,
        })
    }

    /// Validate and build the record to insert. A blank seller name falls
    /// back to the owner's display name.
    pub fn into_new_listing(&self, owner: &Owner) -> Result<NewListing, ValidationError> {
        let c = self.check()?;
        let seller_name = if c.seller_name.is_empty() {
            owner.display_name.clone()
        } else {
            c.seller_name
        };
        Ok(NewListing {
            title: c.title,
            description: c.description,
            price: c.price,
            category: self.category,
            condition: self.condition,
            location: c.location,
            images: c.images,
            owner_id: owner.uid.clone(),
            seller_name,
            seller_contact: c.seller_contact,
        })
    }

    /// Validate and build a patch covering every editable field.
    pub fn into_patch(&self) -> Result<ListingPatch, ValidationError> {
        let c = self.check()?;
        Ok(ListingPatch {
            title: Some(c.title),
            description: Some(c.description),
            price: Some(c.price),
            category: Some(self.category),
            condition: Some(self.condition),
            location: Some(c.location),
            images: Some(c.images),
            seller_name: Some(c.seller_name),
            seller_contact: Some(c.seller_contact),
        })
    }
}

/// Split on commas and newlines, trim, drop blanks, keep at most ten.
pub fn parse_image_urls(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_IMAGES)
        .map(str::to_string)
        .collect()
}

pub fn only_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}
