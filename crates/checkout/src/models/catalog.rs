//! Catalog entities.
//!
//! Products and variants are created and edited by the (external) catalog
//! admin tooling; the checkout engine reads them and mutates exactly one
//! field, the variant's stock counter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wardrobe_core::{ProductId, Sku, VariantId};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name, snapshotted onto order lines at checkout.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Long description.
    pub description: String,
    /// Price before any variant adjustment.
    pub base_price: Decimal,
    /// Inactive products are invisible to the checkout engine.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A purchasable size/color combination of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID.
    pub id: VariantId,
    /// Owning product.
    pub product_id: ProductId,
    /// Globally unique stock-keeping unit.
    pub sku: Sku,
    /// Size label (e.g. "M", "32").
    pub size: String,
    /// Color name.
    pub color: String,
    /// Hex code for swatch rendering.
    pub color_hex: String,
    /// Units on hand. Never negative; the database enforces the floor.
    pub stock_quantity: i32,
    /// Signed delta applied to the product's base price.
    pub price_adjustment: Decimal,
}

impl Variant {
    /// Whether at least `quantity` units are on hand.
    #[must_use]
    pub const fn has_stock(&self, quantity: i32) -> bool {
        self.stock_quantity >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use wardrobe_core::{ProductId, Sku, VariantId};

    fn variant(stock: i32) -> Variant {
        Variant {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            sku: Sku::parse("SHIRT-M-RED").unwrap(),
            size: "M".to_owned(),
            color: "Red".to_owned(),
            color_hex: "#cc0000".to_owned(),
            stock_quantity: stock,
            price_adjustment: Decimal::ZERO,
        }
    }

    #[test]
    fn has_stock_is_inclusive() {
        assert!(variant(2).has_stock(2));
        assert!(variant(2).has_stock(1));
        assert!(!variant(2).has_stock(3));
        assert!(!variant(0).has_stock(1));
    }
}
