//! Catalog reads and the stock counter.
//!
//! The conditional [`decrement_stock`](CatalogRepository::decrement_stock)
//! is the only stock-mutating write in the engine: the guard
//! `stock_quantity >= $qty` lives in the UPDATE itself, so two concurrent
//! checkouts can never jointly overdraw a variant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use wardrobe_core::{ProductId, Sku, VariantId};

use super::RepositoryError;
use crate::models::{Product, Variant};

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: VariantId,
    product_id: ProductId,
    sku: String,
    size: String,
    color: String,
    color_hex: String,
    stock_quantity: i32,
    price_adjustment: Decimal,
}

impl TryFrom<VariantRow> for Variant {
    type Error = RepositoryError;

    fn try_from(row: VariantRow) -> Result<Self, Self::Error> {
        let sku = Sku::parse(&row.sku).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid SKU in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            sku,
            size: row.size,
            color: row.color,
            color_hex: row.color_hex,
            stock_quantity: row.stock_quantity,
            price_adjustment: row.price_adjustment,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    slug: String,
    description: String,
    base_price: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            base_price: row.base_price,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const VARIANT_COLUMNS: &str =
    "id, product_id, sku, size, color, color_hex, stock_quantity, price_adjustment";

/// Repository for catalog reads and stock adjustments.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a variant by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored SKU is invalid.
    pub async fn variant_by_id(
        &self,
        id: VariantId,
    ) -> Result<Option<Variant>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Variant::try_from).transpose()
    }

    /// Get a variant by its SKU.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored SKU is invalid.
    pub async fn variant_by_sku(&self, sku: &Sku) -> Result<Option<Variant>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE sku = $1"
        ))
        .bind(sku.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Variant::try_from).transpose()
    }

    /// Get an active product by its ID. Inactive products resolve as absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, slug, description, base_price, is_active,
                   created_at, updated_at
            FROM products
            WHERE id = $1 AND is_active = true
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Conditionally take `quantity` units from a variant's stock.
    ///
    /// Returns `true` if the decrement applied, `false` if the variant is
    /// missing or holds fewer than `quantity` units (in which case nothing
    /// was written). Runs on a caller-provided connection so checkout can
    /// scope it inside its transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn decrement_stock(
        conn: &mut PgConnection,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product_variants
            SET stock_quantity = stock_quantity - $2
            WHERE id = $1 AND stock_quantity >= $2
            ",
        )
        .bind(variant_id)
        .bind(quantity)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Return `quantity` units to a variant's stock.
    ///
    /// Used when a not-yet-shipped order is cancelled. A missing variant
    /// (removed from the catalog since checkout) is not an error; the
    /// units are simply gone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn restock(
        conn: &mut PgConnection,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE product_variants
            SET stock_quantity = stock_quantity + $2
            WHERE id = $1
            ",
        )
        .bind(variant_id)
        .bind(quantity)
        .execute(conn)
        .await?;

        Ok(())
    }
}
