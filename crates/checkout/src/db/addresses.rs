//! Shopper address storage.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use wardrobe_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::{Address, NewAddress};

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    user_id: UserId,
    title: String,
    full_name: String,
    phone: String,
    address_line1: String,
    address_line2: String,
    city: String,
    state: String,
    postal_code: String,
    country: String,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            full_name: row.full_name,
            phone: row.phone,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            country: row.country,
            is_default: row.is_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ADDRESS_COLUMNS: &str = "id, user_id, title, full_name, phone, \
     address_line1, address_line2, city, state, postal_code, country, \
     is_default, created_at, updated_at";

/// Repository for address operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an address.
    ///
    /// When `is_default` is set, any previous default for the shopper is
    /// cleared in the same transaction, so at most one default exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        addr: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;

        if addr.is_default {
            sqlx::query(
                "UPDATE addresses SET is_default = false, updated_at = now() \
                 WHERE user_id = $1 AND is_default",
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            INSERT INTO addresses (
                user_id, title, full_name, phone,
                address_line1, address_line2, city, state, postal_code, country,
                is_default
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&addr.title)
        .bind(&addr.full_name)
        .bind(&addr.phone)
        .bind(&addr.address_line1)
        .bind(&addr.address_line2)
        .bind(&addr.city)
        .bind(&addr.state)
        .bind(&addr.postal_code)
        .bind(&addr.country)
        .bind(addr.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Get all of a shopper's addresses, default first, then newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            SELECT {ADDRESS_COLUMNS}
            FROM addresses
            WHERE user_id = $1
            ORDER BY is_default DESC, created_at DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Get an address by ID, scoped to the owning shopper.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_id(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }
}
