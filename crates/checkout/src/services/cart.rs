//! Cart service.
//!
//! Owns the shopper's pending selections: add with merge, quantity update,
//! removal, and full materialization with computed prices.

use sqlx::PgPool;

use wardrobe_core::{CartLineId, UserId};

use crate::db::{CartRepository, CatalogRepository};
use crate::error::{CheckoutError, Result};
use crate::models::{AddToCart, CartLine, CartLineView, CartView, UpdateCartLine};

use super::pricing;

/// Cart service.
pub struct CartService<'a> {
    cart: CartRepository<'a>,
    catalog: CatalogRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            cart: CartRepository::new(pool),
            catalog: CatalogRepository::new(pool),
        }
    }

    /// Materialize the shopper's cart: each line joined with its variant
    /// and product, priced, plus aggregate totals.
    ///
    /// Lines whose variant or product no longer resolves are excluded from
    /// the totals and reported via [`CartView::skipped_lines`] instead of
    /// being silently dropped.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` on storage failure.
    pub async fn view(&self, user_id: UserId) -> Result<CartView> {
        let lines = self.cart.lines(user_id).await?;

        let mut views = Vec::with_capacity(lines.len());
        let mut skipped = 0usize;

        for line in lines {
            let Some(variant) = self.catalog.variant_by_id(line.variant_id).await? else {
                skipped += 1;
                continue;
            };
            let Some(product) = self.catalog.product_by_id(variant.product_id).await? else {
                skipped += 1;
                continue;
            };

            let unit_price = pricing::unit_price(&product, &variant);
            views.push(CartLineView {
                id: line.id,
                quantity: line.quantity,
                unit_price,
                line_total: pricing::line_total(unit_price, line.quantity),
                variant,
                product,
            });
        }

        if skipped > 0 {
            tracing::warn!(user_id = %user_id, skipped, "cart contains unresolvable lines");
        }

        let total_items = views.iter().map(|v| v.quantity).sum();
        let total_price = views.iter().map(|v| v.line_total).sum();

        Ok(CartView {
            lines: views,
            total_items,
            total_price,
            skipped_lines: skipped,
        })
    }

    /// Add a variant to the cart, merging into any existing line for the
    /// same variant by summing quantities.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidQuantity` if the quantity is not positive.
    /// Returns `CheckoutError::NotFound` if the variant does not exist.
    /// Returns `CheckoutError::InsufficientStock` if stock is short.
    pub async fn add(&self, user_id: UserId, req: &AddToCart) -> Result<CartLine> {
        if req.quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let variant = self
            .catalog
            .variant_by_id(req.variant_id)
            .await?
            .ok_or(CheckoutError::NotFound("variant"))?;

        if !variant.has_stock(req.quantity) {
            return Err(CheckoutError::InsufficientStock { sku: variant.sku });
        }

        let line = self
            .cart
            .upsert_line(user_id, req.variant_id, req.quantity)
            .await?;

        Ok(line)
    }

    /// Overwrite a cart line's quantity.
    ///
    /// A line id belonging to a different shopper is a silent no-op, the
    /// same as the scoped SQL update it maps to.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidQuantity` if the quantity is not positive.
    pub async fn update(
        &self,
        line_id: CartLineId,
        user_id: UserId,
        req: &UpdateCartLine,
    ) -> Result<()> {
        if req.quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        self.cart
            .update_quantity(line_id, user_id, req.quantity)
            .await?;

        Ok(())
    }

    /// Remove a line from the cart. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` on storage failure.
    pub async fn remove(&self, line_id: CartLineId, user_id: UserId) -> Result<()> {
        self.cart.remove_line(line_id, user_id).await?;
        Ok(())
    }

    /// Empty the cart. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` on storage failure.
    pub async fn clear(&self, user_id: UserId) -> Result<()> {
        self.cart.clear(user_id).await?;
        Ok(())
    }
}
