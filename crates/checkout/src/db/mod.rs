//! Database operations for the checkout `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `products` / `product_variants` - Catalog (read here, written by admin
//!   tooling; checkout only decrements `stock_quantity`)
//! - `cart_lines` - Pending selections, unique per `(user_id, variant_id)`
//! - `addresses` - Shopper shipping addresses
//! - `orders` / `order_lines` - Durable orders and their immutable
//!   snapshots
//!
//! # Migrations
//!
//! Migrations live in `crates/checkout/migrations/` and are embedded via
//! [`MIGRATOR`]:
//!
//! ```rust,ignore
//! wardrobe_checkout::db::MIGRATOR.run(&pool).await?;
//! ```
//!
//! All queries are runtime-checked (`sqlx::query` / `query_as` with
//! `FromRow` row structs); rows are converted to the domain models in
//! [`crate::models`], reporting `DataCorruption` when stored text fails to
//! parse back into its typed form.

pub mod addresses;
pub mod cart;
pub mod catalog;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use orders::OrderRepository;

/// Embedded SQL migrations for the checkout schema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate order number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error to [`Conflict`](Self::Conflict) when it is a
    /// unique violation, passing everything else through as
    /// [`Database`](Self::Database).
    #[must_use]
    pub fn from_unique_violation(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Pool size cap (see [`crate::config::CheckoutConfig`])
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
