//! # Tender Community API Server Library
//!
//! HTTP layer of the Tender Community backend. Persistence, push delivery
//! and email live in `tender-shared`; this crate maps them onto REST routes.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from environment variables
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Path, Query and Json extractors that reject with `ApiError`
//! - `middleware`: Security headers and JSON content type
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
