//! Error taxonomy for the checkout engine.
//!
//! Validation errors are raised before any write. Errors inside the
//! checkout transaction roll the whole transaction back, so callers never
//! observe a partially applied order.

use thiserror::Error;

use wardrobe_core::{OrderStatus, Sku};

use crate::db::RepositoryError;

/// Errors surfaced by the cart, checkout, order, and address services.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Quantity was zero or negative.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    /// A required request field was missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The entity does not exist or is not owned by the caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Requested quantity exceeds units on hand.
    #[error("insufficient stock for {sku}")]
    InsufficientStock {
        /// SKU of the variant that ran short.
        sku: Sku,
    },

    /// Checkout was attempted on an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The order status change is not a legal lifecycle transition.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure; the transaction (if any) was rolled back.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result type alias for [`CheckoutError`].
pub type Result<T> = std::result::Result<T, CheckoutError>;
