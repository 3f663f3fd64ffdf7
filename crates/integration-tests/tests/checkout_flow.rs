//! Integration tests for the cart-to-order flow against real storage.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `WARDROBE_DATABASE_URL` pointing at it (migrations run automatically)
//!
//! Run with: cargo test -p wardrobe-integration-tests -- --ignored
//!
//! Each test seeds its own catalog rows and uses a fresh shopper id, so the
//! suite can run repeatedly against the same database.

use std::sync::atomic::{AtomicI32, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use wardrobe_checkout::db::MIGRATOR;
use wardrobe_checkout::error::CheckoutError;
use wardrobe_checkout::models::{AddToCart, NewAddress, PlaceOrder};
use wardrobe_checkout::services::{AddressService, CartService, CheckoutService, OrderService};
use wardrobe_core::{AddressId, ProductId, Sku, UserId, VariantId};

static SHOPPER_SEQ: AtomicI32 = AtomicI32::new(0);

async fn pool() -> PgPool {
    let url = std::env::var("WARDROBE_DATABASE_URL")
        .expect("WARDROBE_DATABASE_URL must be set for database suites");
    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");
    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

/// A shopper id no other test run has used: low timestamp bits plus a
/// process-local counter.
fn fresh_shopper() -> UserId {
    let base = i32::try_from(Utc::now().timestamp_millis() & 0x3FFF_FFFF).unwrap();
    UserId::new(base.wrapping_add(SHOPPER_SEQ.fetch_add(1, Ordering::Relaxed)))
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Seed one product with one variant; the SKU and slug carry the shopper id
/// so reruns never trip the unique constraints.
async fn seed_variant(
    pool: &PgPool,
    shopper: UserId,
    label: &str,
    base_price: &str,
    adjustment: &str,
    stock: i32,
) -> (VariantId, Sku) {
    let product_id: ProductId = sqlx::query_scalar(
        "INSERT INTO products (name, slug, base_price) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(format!("Test {label}"))
    .bind(format!("test-{label}-{shopper}").to_lowercase())
    .bind(d(base_price))
    .fetch_one(pool)
    .await
    .expect("Failed to seed product");

    let sku = Sku::parse(&format!("TEST-{}-{shopper}", label.to_uppercase())).unwrap();
    let variant_id: VariantId = sqlx::query_scalar(
        r"
        INSERT INTO product_variants (product_id, sku, size, color, stock_quantity, price_adjustment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        ",
    )
    .bind(product_id)
    .bind(sku.as_str())
    .bind("M")
    .bind("Red")
    .bind(stock)
    .bind(d(adjustment))
    .fetch_one(pool)
    .await
    .expect("Failed to seed variant");

    (variant_id, sku)
}

async fn shipping_address(pool: &PgPool, shopper: UserId) -> AddressId {
    let address = AddressService::new(pool)
        .create(
            shopper,
            &NewAddress {
                full_name: "Ada Lovelace".to_owned(),
                address_line1: "12 St James's Square".to_owned(),
                city: "London".to_owned(),
                country: "United Kingdom".to_owned(),
                ..NewAddress::default()
            },
        )
        .await
        .expect("Failed to create address");
    address.id
}

async fn stock_of(pool: &PgPool, variant_id: VariantId) -> i32 {
    sqlx::query_scalar("SELECT stock_quantity FROM product_variants WHERE id = $1")
        .bind(variant_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read stock")
}

fn place(address_id: AddressId) -> PlaceOrder {
    PlaceOrder {
        address_id: Some(address_id),
        payment_method: "credit_card".to_owned(),
        notes: String::new(),
    }
}

// =============================================================================
// Empty Cart
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database (WARDROBE_DATABASE_URL)"]
async fn test_checkout_of_an_empty_cart_creates_no_order() {
    let pool = pool().await;
    let shopper = fresh_shopper();
    let address_id = shipping_address(&pool, shopper).await;

    let err = CheckoutService::new(&pool)
        .place_order(shopper, &place(address_id))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    let orders = OrderService::new(&pool).orders_for(shopper).await.unwrap();
    assert!(orders.is_empty());
}

// =============================================================================
// Merge on Add
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database (WARDROBE_DATABASE_URL)"]
async fn test_adding_the_same_variant_twice_merges_into_one_line() {
    let pool = pool().await;
    let shopper = fresh_shopper();
    let (variant_id, _) = seed_variant(&pool, shopper, "shirt", "29.99", "2.00", 10).await;

    let cart = CartService::new(&pool);
    cart.add(shopper, &AddToCart { variant_id, quantity: 2 })
        .await
        .unwrap();
    let merged = cart
        .add(shopper, &AddToCart { variant_id, quantity: 1 })
        .await
        .unwrap();
    assert_eq!(merged.quantity, 3);

    let view = cart.view(shopper).await.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.total_items, 3);
    assert_eq!(view.lines[0].unit_price, d("31.99"));
    assert_eq!(view.total_price, d("95.97"));
}

// =============================================================================
// Successful Checkout
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database (WARDROBE_DATABASE_URL)"]
async fn test_successful_checkout_takes_stock_and_clears_the_cart() {
    let pool = pool().await;
    let shopper = fresh_shopper();
    let (variant_id, sku) = seed_variant(&pool, shopper, "shirt", "29.99", "2.00", 5).await;

    let cart = CartService::new(&pool);
    cart.add(shopper, &AddToCart { variant_id, quantity: 2 })
        .await
        .unwrap();

    let address_id = shipping_address(&pool, shopper).await;
    let order = CheckoutService::new(&pool)
        .place_order(shopper, &place(address_id))
        .await
        .unwrap();

    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].sku, sku);
    assert_eq!(order.lines[0].quantity, 2);
    assert_eq!(order.subtotal, d("63.98"));
    assert_eq!(order.total, order.subtotal + order.shipping_cost + order.tax);

    assert_eq!(stock_of(&pool, variant_id).await, 3);
    assert!(cart.view(shopper).await.unwrap().is_empty());

    // The order is durable and owner-scoped.
    let fetched = OrderService::new(&pool)
        .order(order.id, shopper)
        .await
        .unwrap();
    assert_eq!(fetched.order_number, order.order_number);
}

// =============================================================================
// Insufficient Stock at Checkout
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database (WARDROBE_DATABASE_URL)"]
async fn test_short_stock_aborts_checkout_without_taking_any_stock() {
    let pool = pool().await;
    let shopper = fresh_shopper();
    let (shirt_id, _) = seed_variant(&pool, shopper, "shirt", "29.99", "0", 5).await;
    let (scarf_id, scarf_sku) = seed_variant(&pool, shopper, "scarf", "12.00", "0", 1).await;

    let cart = CartService::new(&pool);
    cart.add(shopper, &AddToCart { variant_id: shirt_id, quantity: 2 })
        .await
        .unwrap();
    cart.add(shopper, &AddToCart { variant_id: scarf_id, quantity: 1 })
        .await
        .unwrap();

    // The last scarf sells out between add-to-cart and checkout.
    sqlx::query("UPDATE product_variants SET stock_quantity = 0 WHERE id = $1")
        .bind(scarf_id)
        .execute(&pool)
        .await
        .unwrap();

    let address_id = shipping_address(&pool, shopper).await;
    let err = CheckoutService::new(&pool)
        .place_order(shopper, &place(address_id))
        .await
        .unwrap_err();
    assert!(
        matches!(err, CheckoutError::InsufficientStock { ref sku } if *sku == scarf_sku),
        "expected InsufficientStock for the scarf, got {err:?}"
    );

    // Nothing was taken and nothing was created.
    assert_eq!(stock_of(&pool, shirt_id).await, 5);
    assert_eq!(stock_of(&pool, scarf_id).await, 0);
    let orders = OrderService::new(&pool).orders_for(shopper).await.unwrap();
    assert!(orders.is_empty());
    assert_eq!(cart.view(shopper).await.unwrap().lines.len(), 2);
}
