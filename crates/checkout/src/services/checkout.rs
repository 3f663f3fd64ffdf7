//! Checkout orchestration.
//!
//! Converts a shopper's cart into a durable order. The flow is:
//!
//! 1. Validate the request, the address, and the cart (read-only; any
//!    failure aborts with nothing written).
//! 2. Resolve and price every cart line.
//! 3. Inside a single transaction: conditionally decrement stock per line,
//!    insert the order and its line snapshots, and clear the cart.
//!
//! The conditional decrement (`... WHERE stock_quantity >= $qty`) is what
//! makes concurrent checkouts safe: of N shoppers racing for the last
//! units of a variant, at most one transaction finds the guard satisfied;
//! the rest roll back with `InsufficientStock` and leave no trace.

use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use sqlx::PgPool;

use wardrobe_core::UserId;

use crate::db::orders::{NewOrder, NewOrderLine};
use crate::db::{
    AddressRepository, CartRepository, CatalogRepository, OrderRepository, RepositoryError,
};
use crate::error::{CheckoutError, Result};
use crate::models::{Order, PlaceOrder, Product, ShippingAddress, Variant};

use super::pricing;

/// Order number prefix, kept from the warehouse labelling convention.
const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Length of the random order-number suffix.
const SUFFIX_LENGTH: usize = 6;

/// Suffix alphabet. Ambiguous glyphs (0/O, 1/I/L) are excluded because
/// order numbers get read aloud over the phone.
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the shopper's cart into a persisted order.
    ///
    /// On success the order row, its line snapshots, the stock decrements,
    /// and the cart clear have all committed together; on any failure none
    /// of them are visible.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` if the address or payment
    /// method is absent.
    /// Returns `CheckoutError::NotFound` if the address does not belong to
    /// the shopper.
    /// Returns `CheckoutError::EmptyCart` if there is nothing to buy.
    /// Returns `CheckoutError::InsufficientStock` naming the SKU that ran
    /// short; no order is created and no stock is taken.
    /// Returns `CheckoutError::Repository` on storage failure, including
    /// `DataCorruption` when a cart line references a missing variant or
    /// product.
    pub async fn place_order(&self, user_id: UserId, req: &PlaceOrder) -> Result<Order> {
        // Step 1: request validation, all read-only.
        let address_id = req
            .address_id
            .ok_or(CheckoutError::MissingField("address_id"))?;
        if req.payment_method.trim().is_empty() {
            return Err(CheckoutError::MissingField("payment_method"));
        }

        let address = AddressRepository::new(self.pool)
            .by_id(address_id, user_id)
            .await?
            .ok_or(CheckoutError::NotFound("address"))?;

        let cart_lines = CartRepository::new(self.pool).lines(user_id).await?;
        if cart_lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Step 2: resolve and price every line. A reference that no longer
        // resolves is data corruption, not something to silently skip.
        let catalog = CatalogRepository::new(self.pool);
        let mut priced = Vec::with_capacity(cart_lines.len());

        for line in &cart_lines {
            let variant = catalog
                .variant_by_id(line.variant_id)
                .await?
                .ok_or_else(|| corrupt_line(line.variant_id.as_i32(), "variant"))?;

            if !variant.has_stock(line.quantity) {
                return Err(CheckoutError::InsufficientStock { sku: variant.sku });
            }

            let product = catalog
                .product_by_id(variant.product_id)
                .await?
                .ok_or_else(|| corrupt_line(line.variant_id.as_i32(), "product"))?;

            priced.push((snapshot_line(&product, &variant, line.quantity), variant));
        }

        let subtotal: Decimal = priced.iter().map(|(line, _)| line.total_price).sum();

        // Step 3: one transaction for everything that writes.
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        for (line, variant) in &priced {
            let taken =
                CatalogRepository::decrement_stock(&mut tx, variant.id, line.quantity).await?;
            if !taken {
                // Another checkout won the race since the read above.
                tx.rollback().await.map_err(RepositoryError::from)?;
                return Err(CheckoutError::InsufficientStock {
                    sku: variant.sku.clone(),
                });
            }
        }

        let new_order = NewOrder {
            user_id,
            order_number: generate_order_number(),
            shipping: ShippingAddress::from(&address),
            subtotal,
            shipping_cost: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: subtotal,
            payment_method: req.payment_method.clone(),
            notes: req.notes.clone(),
        };

        let mut order = OrderRepository::insert_order(&mut tx, &new_order).await?;
        for (line, _) in &priced {
            let inserted = OrderRepository::insert_line(&mut tx, order.id, line).await?;
            order.lines.push(inserted);
        }

        CartRepository::clear_on(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %user_id,
            total = %order.total,
            lines = order.lines.len(),
            "order placed"
        );

        Ok(order)
    }
}

fn corrupt_line(variant_id: i32, what: &str) -> CheckoutError {
    CheckoutError::Repository(RepositoryError::DataCorruption(format!(
        "cart line references missing {what} (variant {variant_id})"
    )))
}

/// Freeze one cart line into an order-line snapshot.
fn snapshot_line(product: &Product, variant: &Variant, quantity: i32) -> NewOrderLine {
    let unit_price = pricing::unit_price(product, variant);
    NewOrderLine {
        variant_id: variant.id,
        product_name: product.name.clone(),
        sku: variant.sku.clone(),
        size: variant.size.clone(),
        color: variant.color.clone(),
        quantity,
        unit_price,
        total_price: pricing::line_total(unit_price, quantity),
    }
}

/// Generate an order number: `ORD-<unix millis>-<6 random chars>`.
///
/// The millisecond timestamp keeps numbers roughly sortable; the random
/// suffix keeps two orders in the same millisecond from colliding. The
/// UNIQUE constraint on `orders.order_number` is the final arbiter.
fn generate_order_number() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| {
            SUFFIX_ALPHABET
                .choose(&mut rng)
                .copied()
                .unwrap_or(b'X') as char
        })
        .collect();
    format!("{ORDER_NUMBER_PREFIX}-{millis}-{suffix}")
}
