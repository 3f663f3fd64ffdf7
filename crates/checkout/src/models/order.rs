//! Orders and their immutable line snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wardrobe_core::{
    AddressId, OrderId, OrderLineId, OrderStatus, PaymentStatus, Sku, UserId, VariantId,
};

use super::address::Address;

/// The shipping destination frozen onto an order at checkout.
///
/// A copy of the [`Address`] fields, not a reference: deleting or editing
/// the address later must not change what the order shipped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient name.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address_line1: String,
    /// Apartment, suite, etc.
    pub address_line2: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
}

impl From<&Address> for ShippingAddress {
    fn from(addr: &Address) -> Self {
        Self {
            full_name: addr.full_name.clone(),
            phone: addr.phone.clone(),
            address_line1: addr.address_line1.clone(),
            address_line2: addr.address_line2.clone(),
            city: addr.city.clone(),
            state: addr.state.clone(),
            postal_code: addr.postal_code.clone(),
            country: addr.country.clone(),
        }
    }
}

/// A durable order.
///
/// Immutable after creation except for `status`, `payment_status`, and the
/// provider transaction id. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Shopper who placed the order.
    pub user_id: UserId,
    /// Human-readable unique order number, e.g. `ORD-1724505600000-7KQ2M9`.
    pub order_number: String,
    /// Frozen shipping destination.
    pub shipping: ShippingAddress,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Shipping cost. Currently always zero (free shipping policy).
    pub shipping_cost: Decimal,
    /// Tax. Currently always zero.
    pub tax: Decimal,
    /// `subtotal + shipping_cost + tax`.
    pub total: Decimal,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// How the shopper chose to pay, e.g. `credit_card`.
    pub payment_method: String,
    /// Payment status reported by the provider collaborator.
    pub payment_status: PaymentStatus,
    /// Provider-reported transaction id, set on payment confirmation.
    pub payment_transaction_id: Option<String>,
    /// Free-form shopper notes.
    pub notes: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
    /// Immutable line snapshots.
    pub lines: Vec<OrderLine>,
}

/// An immutable snapshot of one cart line at the moment of checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Line ID.
    pub id: OrderLineId,
    /// Owning order.
    pub order_id: OrderId,
    /// Back-reference to the variant. `None` once the variant is removed
    /// from the catalog; the snapshot fields below stay authoritative.
    pub variant_id: Option<VariantId>,
    /// Product name at checkout time.
    pub product_name: String,
    /// Variant SKU at checkout time.
    pub sku: Sku,
    /// Size label at checkout time.
    pub size: String,
    /// Color name at checkout time.
    pub color: String,
    /// Units ordered.
    pub quantity: i32,
    /// Per-unit price at checkout time.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total_price: Decimal,
    /// When the snapshot was written.
    pub created_at: DateTime<Utc>,
}

/// Request to convert the cart into an order.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    /// Shipping address to freeze onto the order.
    pub address_id: Option<AddressId>,
    /// How the shopper will pay, e.g. `credit_card`, `cash_on_delivery`.
    #[serde(default)]
    pub payment_method: String,
    /// Free-form notes for the packer.
    #[serde(default)]
    pub notes: String,
}
