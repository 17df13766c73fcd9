//! # Contactgate Web Server Library
//!
//! This library provides the core functionality for the Contactgate web
//! server: a login-gated view of the contacts spreadsheet.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers and the session gate
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
