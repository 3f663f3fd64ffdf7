//! Order queries and lifecycle transitions.
//!
//! Status changes go through [`OrderStatus::can_transition_to`]; there is
//! no way to un-deliver or un-cancel an order through this service. The
//! current status is read under a row lock so two concurrent transitions
//! cannot both pass the guard.

use sqlx::PgPool;

use wardrobe_core::{OrderId, OrderStatus, UserId};

use crate::db::{CatalogRepository, OrderRepository, RepositoryError};
use crate::error::{CheckoutError, Result};
use crate::models::Order;

/// Order service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
        }
    }

    /// Get the shopper's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` on storage failure.
    pub async fn orders_for(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self.orders.orders_by_user(user_id).await?)
    }

    /// Get every order in the store, newest first (admin).
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` on storage failure.
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        Ok(self.orders.all_orders().await?)
    }

    /// Get one order with its lines, scoped to the owning shopper.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotFound` if the order is absent or owned
    /// by a different shopper.
    pub async fn order(&self, id: OrderId, user_id: UserId) -> Result<Order> {
        self.orders
            .order_by_id(id, user_id)
            .await?
            .ok_or(CheckoutError::NotFound("order"))
    }

    /// Get one order with its lines regardless of owner (admin).
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotFound` if the order is absent.
    pub async fn order_any(&self, id: OrderId) -> Result<Order> {
        self.orders
            .order_by_id_any(id)
            .await?
            .ok_or(CheckoutError::NotFound("order"))
    }

    /// Move an order to a new status (admin).
    ///
    /// Cancelling an order also returns its line quantities to stock, in
    /// the same transaction; cancellation is only reachable before
    /// shipment, so restocking cannot double-count delivered goods.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotFound` if the order is absent.
    /// Returns `CheckoutError::InvalidTransition` if the order's current
    /// status does not allow the move.
    pub async fn update_status(&self, id: OrderId, next: OrderStatus) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let current = OrderRepository::status_for_update(&mut tx, id)
            .await?
            .ok_or(CheckoutError::NotFound("order"))?;

        if !current.can_transition_to(next) {
            return Err(CheckoutError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        OrderRepository::set_status(&mut tx, id, next).await?;

        if next == OrderStatus::Cancelled {
            let lines = OrderRepository::lines_on(&mut tx, id).await?;
            for line in lines {
                if let Some(variant_id) = line.variant_id {
                    CatalogRepository::restock(&mut tx, variant_id, line.quantity).await?;
                }
            }
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(order_id = %id, from = %current, to = %next, "order status changed");

        Ok(())
    }

    /// Record an out-of-band payment confirmation from the payment
    /// collaborator: status `confirmed`, payment status `paid`, provider
    /// transaction id stored.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotFound` if the order is absent.
    /// Returns `CheckoutError::InvalidTransition` if the order has already
    /// left `pending`.
    pub async fn confirm_payment(&self, id: OrderId, transaction_id: &str) -> Result<Order> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let current = OrderRepository::status_for_update(&mut tx, id)
            .await?
            .ok_or(CheckoutError::NotFound("order"))?;

        if !current.can_transition_to(OrderStatus::Confirmed) {
            return Err(CheckoutError::InvalidTransition {
                from: current,
                to: OrderStatus::Confirmed,
            });
        }

        OrderRepository::set_payment_confirmed(&mut tx, id, transaction_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(order_id = %id, "payment confirmed");

        self.order_any(id).await
    }
}
