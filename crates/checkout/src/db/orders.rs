//! Order and order-line storage.
//!
//! Orders are insert-only; after creation the engine touches exactly three
//! columns (`status`, `payment_status`, `payment_transaction_id`). Order
//! lines are never touched again at all.
//!
//! The write methods take a caller-provided connection so the checkout and
//! order services can scope them inside one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use wardrobe_core::{OrderId, OrderLineId, OrderStatus, PaymentStatus, Sku, UserId, VariantId};

use super::RepositoryError;
use crate::models::{Order, OrderLine, ShippingAddress};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    order_number: String,
    shipping_full_name: String,
    shipping_phone: String,
    shipping_address_line1: String,
    shipping_address_line2: String,
    shipping_city: String,
    shipping_state: String,
    shipping_postal_code: String,
    shipping_country: String,
    subtotal: Decimal,
    shipping_cost: Decimal,
    tax: Decimal,
    total: Decimal,
    status: String,
    payment_method: String,
    payment_status: String,
    payment_transaction_id: Option<String>,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;
        let payment_status = row.payment_status.parse::<PaymentStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            order_number: row.order_number,
            shipping: ShippingAddress {
                full_name: row.shipping_full_name,
                phone: row.shipping_phone,
                address_line1: row.shipping_address_line1,
                address_line2: row.shipping_address_line2,
                city: row.shipping_city,
                state: row.shipping_state,
                postal_code: row.shipping_postal_code,
                country: row.shipping_country,
            },
            subtotal: row.subtotal,
            shipping_cost: row.shipping_cost,
            tax: row.tax,
            total: row.total,
            status,
            payment_method: row.payment_method,
            payment_status,
            payment_transaction_id: row.payment_transaction_id,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            lines: Vec::new(),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: OrderLineId,
    order_id: OrderId,
    variant_id: Option<VariantId>,
    product_name: String,
    sku: String,
    size: String,
    color: String,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        let sku = Sku::parse(&row.sku).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid SKU in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            order_id: row.order_id,
            variant_id: row.variant_id,
            product_name: row.product_name,
            sku,
            size: row.size,
            color: row.color,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            created_at: row.created_at,
        })
    }
}

/// Parameters for inserting an order.
pub struct NewOrder {
    /// Shopper placing the order.
    pub user_id: UserId,
    /// Pre-generated unique order number.
    pub order_number: String,
    /// Frozen shipping destination.
    pub shipping: ShippingAddress,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Shipping cost (currently zero).
    pub shipping_cost: Decimal,
    /// Tax (currently zero).
    pub tax: Decimal,
    /// `subtotal + shipping_cost + tax`.
    pub total: Decimal,
    /// Payment method chosen by the shopper.
    pub payment_method: String,
    /// Free-form shopper notes.
    pub notes: String,
}

/// Parameters for inserting one order line snapshot.
pub struct NewOrderLine {
    /// Variant the snapshot was taken from.
    pub variant_id: VariantId,
    /// Product name at checkout time.
    pub product_name: String,
    /// Variant SKU at checkout time.
    pub sku: Sku,
    /// Size label.
    pub size: String,
    /// Color name.
    pub color: String,
    /// Units ordered.
    pub quantity: i32,
    /// Per-unit price.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total_price: Decimal,
}

const ORDER_COLUMNS: &str = "id, user_id, order_number, \
     shipping_full_name, shipping_phone, shipping_address_line1, \
     shipping_address_line2, shipping_city, shipping_state, \
     shipping_postal_code, shipping_country, \
     subtotal, shipping_cost, tax, total, \
     status, payment_method, payment_status, payment_transaction_id, notes, \
     created_at, updated_at";

const ORDER_LINE_COLUMNS: &str = "id, order_id, variant_id, product_name, sku, \
     size, color, quantity, unit_price, total_price, created_at";

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert the order row with status `pending` / payment `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert_order(
        conn: &mut PgConnection,
        order: &NewOrder,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (
                user_id, order_number,
                shipping_full_name, shipping_phone, shipping_address_line1,
                shipping_address_line2, shipping_city, shipping_state,
                shipping_postal_code, shipping_country,
                subtotal, shipping_cost, tax, total,
                status, payment_method, payment_status, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                      $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.user_id)
        .bind(&order.order_number)
        .bind(&order.shipping.full_name)
        .bind(&order.shipping.phone)
        .bind(&order.shipping.address_line1)
        .bind(&order.shipping.address_line2)
        .bind(&order.shipping.city)
        .bind(&order.shipping.state)
        .bind(&order.shipping.postal_code)
        .bind(&order.shipping.country)
        .bind(order.subtotal)
        .bind(order.shipping_cost)
        .bind(order.tax)
        .bind(order.total)
        .bind(OrderStatus::Pending.to_string())
        .bind(&order.payment_method)
        .bind(PaymentStatus::Pending.to_string())
        .bind(&order.notes)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "order number"))?;

        row.try_into()
    }

    /// Insert one immutable order line snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_line(
        conn: &mut PgConnection,
        order_id: OrderId,
        line: &NewOrderLine,
    ) -> Result<OrderLine, RepositoryError> {
        let row = sqlx::query_as::<_, OrderLineRow>(&format!(
            r"
            INSERT INTO order_lines (
                order_id, variant_id, product_name, sku, size, color,
                quantity, unit_price, total_price
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_LINE_COLUMNS}
            "
        ))
        .bind(order_id)
        .bind(line.variant_id)
        .bind(&line.product_name)
        .bind(line.sku.as_str())
        .bind(&line.size)
        .bind(&line.color)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.total_price)
        .fetch_one(conn)
        .await?;

        row.try_into()
    }

    /// Get a shopper's orders, newest first. Lines are not loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn orders_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Get every order in the store, newest first (admin). Lines are not
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Get an order with its lines, scoped to the owning shopper.
    ///
    /// An order belonging to a different shopper resolves as absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_by_id(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut order = Order::try_from(row)?;
                order.lines = self.lines_for(id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Get an order with its lines regardless of owner (admin and payment
    /// confirmation paths).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_by_id_any(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut order = Order::try_from(row)?;
                order.lines = self.lines_for(id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Get the lines for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderLineRow>(&format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderLine::try_from).collect()
    }

    /// Transaction-scoped [`lines_for`](Self::lines_for), used by the
    /// cancellation restock path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_on(
        conn: &mut PgConnection,
        order_id: OrderId,
    ) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderLineRow>(&format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(conn)
        .await?;

        rows.into_iter().map(OrderLine::try_from).collect()
    }

    /// Read an order's current status with a row lock, so a status change
    /// can be guarded against concurrent transitions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored status is invalid.
    pub async fn status_for_update(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<Option<OrderStatus>, RepositoryError> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;

        status
            .map(|s| {
                s.parse::<OrderStatus>().map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
                })
            })
            .transpose()
    }

    /// Overwrite an order's status. The legality of the transition is the
    /// service's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE orders SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status.to_string())
            .bind(id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Mark an order paid: status `confirmed`, payment status `paid`, and
    /// the provider-reported transaction id recorded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_payment_confirmed(
        conn: &mut PgConnection,
        id: OrderId,
        transaction_id: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE orders
            SET status = $1,
                payment_status = $2,
                payment_transaction_id = $3,
                updated_at = now()
            WHERE id = $4
            ",
        )
        .bind(OrderStatus::Confirmed.to_string())
        .bind(PaymentStatus::Paid.to_string())
        .bind(transaction_id)
        .bind(id)
        .execute(conn)
        .await?;

        Ok(())
    }
}
