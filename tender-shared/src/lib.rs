//! # Tender Shared Library
//!
//! Persistence and integration layer of the tender bookkeeping service,
//! used by the API server and its tests.
//!
//! ## Module Organization
//!
//! - `db`: MySQL connection pool and embedded migrations
//! - `models`: Database models, their SQL and reporting aggregates
//! - `auth`: Password hashing
//! - `push`: Push notification delivery (Firebase Cloud Messaging)
//! - `mail`: Outgoing email (password recovery)

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;
pub mod push;

/// Current version of the tender shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
