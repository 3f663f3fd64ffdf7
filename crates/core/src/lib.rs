//! Wardrobe Core - Shared types library.
//!
//! This crate provides common types used across all Wardrobe components:
//! - `checkout` - Cart, order, and inventory engine
//! - `integration-tests` - Cross-crate test suite
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, SKUs, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
