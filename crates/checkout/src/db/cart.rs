//! Cart line storage.
//!
//! One row per `(user_id, variant_id)`; the merge-on-add behavior is an
//! upsert so concurrent adds of the same variant still collapse into a
//! single line.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use wardrobe_core::{CartLineId, UserId, VariantId};

use super::RepositoryError;
use crate::models::CartLine;

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: CartLineId,
    user_id: UserId,
    variant_id: VariantId,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            variant_id: row.variant_id,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart line operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get all of a shopper's cart lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT id, user_id, variant_id, quantity, created_at, updated_at
            FROM cart_lines
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Insert a cart line, or merge into the existing line for the same
    /// variant by summing quantities.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert_line(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            r"
            INSERT INTO cart_lines (user_id, variant_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, variant_id)
            DO UPDATE SET quantity = cart_lines.quantity + excluded.quantity,
                          updated_at = now()
            RETURNING id, user_id, variant_id, quantity, created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(variant_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite a line's quantity, scoped to the owning shopper.
    ///
    /// Returns the number of rows touched: zero when the line does not
    /// exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_quantity(
        &self,
        line_id: CartLineId,
        user_id: UserId,
        quantity: i32,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_lines
            SET quantity = $1, updated_at = now()
            WHERE id = $2 AND user_id = $3
            ",
        )
        .bind(quantity)
        .bind(line_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a line, scoped to the owning shopper. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_line(
        &self,
        line_id: CartLineId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_lines WHERE id = $1 AND user_id = $2")
            .bind(line_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Delete all of a shopper's cart lines. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Transaction-scoped [`clear`](Self::clear), used by checkout so the
    /// cart empties atomically with the order insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear_on(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
