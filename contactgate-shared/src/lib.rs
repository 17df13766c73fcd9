//! # Contactgate Shared Library
//!
//! Types and logic shared by the Contactgate web server and the static
//! export tool.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, session tokens, login and registration
//! - `contacts`: CSV ingestion and grouping
//! - `db`: connection pool and embedded migrations
//! - `models`: database models
//! - `render`: HTML templates

pub mod auth;
pub mod contacts;
pub mod db;
pub mod models;
pub mod render;

/// Current version of the Contactgate shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
