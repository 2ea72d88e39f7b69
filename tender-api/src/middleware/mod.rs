/// Middleware modules for the API server
///
/// - Security headers
/// - JSON content type defaulting

pub mod json;
pub mod security;
