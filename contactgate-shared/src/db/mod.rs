/// Database layer for Contactgate
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a start-up health check
/// - `migrations`: embedded schema migrations
/// - Models are in the `models` module at crate root level

pub mod pool;
pub mod migrations;
