//! Cart entities and the materialized cart view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wardrobe_core::{CartLineId, UserId, VariantId};

use super::catalog::{Product, Variant};

/// One (shopper, variant) selection pending checkout.
///
/// Unique per `(user_id, variant_id)`; adding the same variant twice merges
/// by summing quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Line ID.
    pub id: CartLineId,
    /// Owning shopper.
    pub user_id: UserId,
    /// Selected variant.
    pub variant_id: VariantId,
    /// Units requested. Always positive.
    pub quantity: i32,
    /// When the line was first added.
    pub created_at: DateTime<Utc>,
    /// When the quantity last changed.
    pub updated_at: DateTime<Utc>,
}

/// Request to add a variant to the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCart {
    /// Variant to add.
    pub variant_id: VariantId,
    /// Units to add; merged into any existing line for the same variant.
    pub quantity: i32,
}

/// Request to overwrite a cart line's quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartLine {
    /// New quantity; must be positive.
    pub quantity: i32,
}

/// A cart line joined with its variant and product, priced.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    /// Line ID.
    pub id: CartLineId,
    /// Units requested.
    pub quantity: i32,
    /// Effective per-unit price (base price + adjustment).
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub line_total: Decimal,
    /// The selected variant.
    pub variant: Variant,
    /// The variant's product.
    pub product: Product,
}

/// The fully materialized cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Priced lines, newest first.
    pub lines: Vec<CartLineView>,
    /// Sum of line quantities.
    pub total_items: i32,
    /// Sum of line totals.
    pub total_price: Decimal,
    /// Lines dropped because their variant or product no longer resolves.
    /// Zero in a healthy catalog; surfaced so callers can tell the
    /// difference between an empty cart and a corrupted one.
    pub skipped_lines: usize,
}

impl CartView {
    /// Whether the cart holds no resolvable lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
