/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
///
/// User credentials are checked in `models::user`; this module only owns the
/// hashing scheme so it can be swapped without touching the queries.

pub mod password;
