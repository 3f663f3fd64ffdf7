//! Wardrobe checkout engine.
//!
//! This crate owns the one part of the store with real invariants to
//! protect: converting a shopper's cart into a durable order without
//! overselling stock, without inconsistent totals, and without leaving a
//! checkout half-applied.
//!
//! The HTTP layer, authentication, and the payment provider live outside
//! this crate. Callers hand the services an authenticated [`UserId`]
//! (`wardrobe_core::UserId`) plus a request struct and get back typed
//! results.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`db`] - `PostgreSQL` repositories (sqlx)
//! - [`models`] - Domain entities and view types
//! - [`services`] - Cart, pricing, checkout, order, and address services
//! - [`error`] - The [`CheckoutError`](error::CheckoutError) taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
