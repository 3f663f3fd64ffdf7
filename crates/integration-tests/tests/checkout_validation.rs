//! Integration tests for the pre-write validation paths.
//!
//! Every rejection asserted here must happen before the first SQL round
//! trip: the services run against a lazily-connected pool pointing at an
//! unreachable address, so reaching the database would fail the test with
//! a connection error instead of the expected validation error.

use wardrobe_checkout::error::CheckoutError;
use wardrobe_checkout::models::{AddToCart, PlaceOrder, UpdateCartLine};
use wardrobe_checkout::services::{CartService, CheckoutService};
use wardrobe_core::{AddressId, CartLineId, UserId, VariantId};
use wardrobe_integration_tests::lazy_pool;

const SHOPPER: UserId = UserId::new(1);

// =============================================================================
// Cart Quantity Validation
// =============================================================================

#[tokio::test]
async fn test_add_rejects_zero_quantity() {
    let pool = lazy_pool();
    let cart = CartService::new(&pool);

    let err = cart
        .add(
            SHOPPER,
            &AddToCart {
                variant_id: VariantId::new(1),
                quantity: 0,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::InvalidQuantity));
}

#[tokio::test]
async fn test_add_rejects_negative_quantity() {
    let pool = lazy_pool();
    let cart = CartService::new(&pool);

    let err = cart
        .add(
            SHOPPER,
            &AddToCart {
                variant_id: VariantId::new(1),
                quantity: -3,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::InvalidQuantity));
}

#[tokio::test]
async fn test_update_to_zero_quantity_is_rejected() {
    let pool = lazy_pool();
    let cart = CartService::new(&pool);

    let err = cart
        .update(CartLineId::new(9), SHOPPER, &UpdateCartLine { quantity: 0 })
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::InvalidQuantity));
}

// =============================================================================
// Checkout Request Validation
// =============================================================================

#[tokio::test]
async fn test_place_order_requires_an_address() {
    let pool = lazy_pool();
    let checkout = CheckoutService::new(&pool);

    let err = checkout
        .place_order(
            SHOPPER,
            &PlaceOrder {
                address_id: None,
                payment_method: "credit_card".to_owned(),
                notes: String::new(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::MissingField("address_id")));
}

#[tokio::test]
async fn test_place_order_requires_a_payment_method() {
    let pool = lazy_pool();
    let checkout = CheckoutService::new(&pool);

    for method in ["", "   "] {
        let err = checkout
            .place_order(
                SHOPPER,
                &PlaceOrder {
                    address_id: Some(AddressId::new(1)),
                    payment_method: method.to_owned(),
                    notes: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::MissingField("payment_method")));
    }
}

// =============================================================================
// Error Surface
// =============================================================================

#[test]
fn test_errors_render_for_the_response_layer() {
    use wardrobe_core::{OrderStatus, Sku};

    assert_eq!(
        CheckoutError::InvalidQuantity.to_string(),
        "quantity must be greater than zero"
    );
    assert_eq!(
        CheckoutError::MissingField("payment_method").to_string(),
        "missing required field: payment_method"
    );
    assert_eq!(CheckoutError::EmptyCart.to_string(), "cart is empty");
    assert_eq!(
        CheckoutError::InsufficientStock {
            sku: Sku::parse("SHIRT-M-RED").unwrap(),
        }
        .to_string(),
        "insufficient stock for SHIRT-M-RED"
    );
    assert_eq!(
        CheckoutError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        }
        .to_string(),
        "cannot move order from delivered to pending"
    );
}
