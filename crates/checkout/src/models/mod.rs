//! Domain entities and view types for the checkout engine.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;

pub use address::{Address, NewAddress};
pub use cart::{AddToCart, CartLine, CartLineView, CartView, UpdateCartLine};
pub use catalog::{Product, Variant};
pub use order::{Order, OrderLine, PlaceOrder, ShippingAddress};
