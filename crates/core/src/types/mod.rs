//! Core types for Wardrobe.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod sku;
pub mod status;

pub use id::*;
pub use sku::{Sku, SkuError};
pub use status::*;
