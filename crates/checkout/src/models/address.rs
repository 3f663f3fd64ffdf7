//! Shopper addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wardrobe_core::{AddressId, UserId};

/// A shopper-owned shipping address.
///
/// Orders copy these fields at checkout rather than referencing the row,
/// so later edits never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Address ID.
    pub id: AddressId,
    /// Owning shopper.
    pub user_id: UserId,
    /// Shopper-facing label, e.g. "Home" or "Work".
    pub title: String,
    /// Recipient name.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address_line1: String,
    /// Apartment, suite, etc.
    pub address_line2: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Preselected at checkout. At most one per shopper.
    pub is_default: bool,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
    /// When the address was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Request to create an address.
///
/// `full_name`, `address_line1`, `city`, and `country` are required; the
/// rest may be left empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAddress {
    /// Shopper-facing label.
    #[serde(default)]
    pub title: String,
    /// Recipient name.
    pub full_name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Street address.
    pub address_line1: String,
    /// Apartment, suite, etc.
    #[serde(default)]
    pub address_line2: String,
    /// City.
    pub city: String,
    /// State or province.
    #[serde(default)]
    pub state: String,
    /// Postal code.
    #[serde(default)]
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Make this the shopper's default; clears any previous default.
    #[serde(default)]
    pub is_default: bool,
}
