//! Effective price computation.
//!
//! The one place unit prices are computed, so the cart view and the
//! checkout snapshot can never disagree about what a line costs.

use rust_decimal::Decimal;

use crate::models::{Product, Variant};

/// Effective per-unit price: the product's base price plus the variant's
/// signed adjustment.
#[must_use]
pub fn unit_price(product: &Product, variant: &Variant) -> Decimal {
    product.base_price + variant.price_adjustment
}

/// Line total for `quantity` units at `unit_price`.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wardrobe_core::{ProductId, Sku, VariantId};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(base_price: Decimal) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Oxford Shirt".to_owned(),
            slug: "oxford-shirt".to_owned(),
            description: String::new(),
            base_price,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variant(adjustment: Decimal) -> Variant {
        Variant {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            sku: Sku::parse("SHIRT-M-RED").unwrap(),
            size: "M".to_owned(),
            color: "Red".to_owned(),
            color_hex: "#cc0000".to_owned(),
            stock_quantity: 10,
            price_adjustment: adjustment,
        }
    }

    #[test]
    fn unit_price_adds_the_adjustment() {
        assert_eq!(
            unit_price(&product(d("29.99")), &variant(d("2.00"))),
            d("31.99")
        );
    }

    #[test]
    fn negative_adjustments_discount() {
        assert_eq!(
            unit_price(&product(d("29.99")), &variant(d("-5.00"))),
            d("24.99")
        );
    }

    #[test]
    fn zero_adjustment_is_the_base_price() {
        assert_eq!(
            unit_price(&product(d("29.99")), &variant(Decimal::ZERO)),
            d("29.99")
        );
    }

    #[test]
    fn line_total_scales_by_quantity() {
        assert_eq!(line_total(d("31.99"), 3), d("95.97"));
        assert_eq!(line_total(d("31.99"), 1), d("31.99"));
    }
}
