/// Middleware modules for the web server
///
/// - `security`: security headers on every response
/// - `session`: session gate for the protected pages

pub mod security;
pub mod session;
