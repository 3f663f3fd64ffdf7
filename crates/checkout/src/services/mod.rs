//! Service layer: the operations the (external) HTTP handlers call.
//!
//! Every service borrows the shared [`sqlx::PgPool`] and returns
//! [`crate::error::CheckoutError`] results.

pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod pricing;

pub use addresses::AddressService;
pub use cart::CartService;
pub use checkout::CheckoutService;
pub use orders::OrderService;
