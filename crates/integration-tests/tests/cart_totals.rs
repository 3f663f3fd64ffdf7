//! Integration tests for pricing arithmetic and serialized shapes.

use chrono::Utc;
use rust_decimal::Decimal;

use wardrobe_checkout::models::{CartLineView, CartView, Product, Variant};
use wardrobe_checkout::services::pricing;
use wardrobe_core::{CartLineId, ProductId, Sku, VariantId};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn product(id: i32, name: &str, base_price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: String::new(),
        base_price: d(base_price),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn variant(id: i32, product_id: i32, sku: &str, adjustment: &str, stock: i32) -> Variant {
    Variant {
        id: VariantId::new(id),
        product_id: ProductId::new(product_id),
        sku: Sku::parse(sku).unwrap(),
        size: "M".to_owned(),
        color: "Red".to_owned(),
        color_hex: "#cc0000".to_owned(),
        stock_quantity: stock,
        price_adjustment: d(adjustment),
    }
}

fn priced_line(id: i32, product: Product, variant: Variant, quantity: i32) -> CartLineView {
    let unit_price = pricing::unit_price(&product, &variant);
    CartLineView {
        id: CartLineId::new(id),
        quantity,
        unit_price,
        line_total: pricing::line_total(unit_price, quantity),
        variant,
        product,
    }
}

// =============================================================================
// Totals Invariant
// =============================================================================

#[test]
fn test_cart_total_is_the_sum_of_line_totals() {
    let lines = vec![
        priced_line(
            1,
            product(1, "Oxford Shirt", "29.99"),
            variant(10, 1, "SHIRT-M-RED", "2.00", 5),
            2,
        ),
        priced_line(
            2,
            product(2, "Selvedge Jeans", "89.00"),
            variant(11, 2, "JEANS-32-BLUE", "-4.00", 3),
            1,
        ),
    ];

    let total_items: i32 = lines.iter().map(|l| l.quantity).sum();
    let total_price: Decimal = lines.iter().map(|l| l.line_total).sum();

    let view = CartView {
        lines,
        total_items,
        total_price,
        skipped_lines: 0,
    };

    // 2 * 31.99 + 1 * 85.00
    assert_eq!(view.total_price, d("148.98"));
    assert_eq!(view.total_items, 3);
    assert!(!view.is_empty());
}

/// SHIRT-M-RED at base 29.99 + 2.00 adjustment, quantity 2 takes the
/// full stock of 2.
#[test]
fn test_shirt_m_red_scenario_arithmetic() {
    let product = product(1, "Oxford Shirt", "29.99");
    let variant = variant(10, 1, "SHIRT-M-RED", "2.00", 2);

    assert!(variant.has_stock(2));
    assert!(!variant.has_stock(3)); // shopper B's extra unit is refused

    let unit = pricing::unit_price(&product, &variant);
    assert_eq!(unit, d("31.99"));
    assert_eq!(pricing::line_total(unit, 2), d("63.98"));
}

#[test]
fn test_empty_cart_view() {
    let view = CartView {
        lines: Vec::new(),
        total_items: 0,
        total_price: Decimal::ZERO,
        skipped_lines: 0,
    };
    assert!(view.is_empty());
}

#[test]
fn test_skipped_lines_do_not_count_toward_totals() {
    // One resolvable line plus two dangling references: the view carries
    // the skip count, and totals reflect only the resolvable line.
    let lines = vec![priced_line(
        1,
        product(1, "Oxford Shirt", "29.99"),
        variant(10, 1, "SHIRT-M-RED", "0", 5),
        1,
    )];

    let view = CartView {
        total_items: lines.iter().map(|l| l.quantity).sum(),
        total_price: lines.iter().map(|l| l.line_total).sum(),
        lines,
        skipped_lines: 2,
    };

    assert_eq!(view.total_price, d("29.99"));
    assert_eq!(view.skipped_lines, 2);
}

// =============================================================================
// Serialized Shapes
// =============================================================================

#[test]
fn test_ids_and_skus_serialize_transparently() {
    let v = variant(10, 1, "SHIRT-M-RED", "2.00", 5);
    let json = serde_json::to_value(&v).unwrap();

    assert_eq!(json["id"], 10);
    assert_eq!(json["product_id"], 1);
    assert_eq!(json["sku"], "SHIRT-M-RED");
    assert_eq!(json["stock_quantity"], 5);
}

#[test]
fn test_decimals_serialize_as_strings() {
    // rust_decimal's serde-with-str keeps money exact on the wire.
    let p = product(1, "Oxford Shirt", "29.99");
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["base_price"], "29.99");
}
