/// Route handlers
///
/// - `pages`: login and registration forms
/// - `auth`: login, registration and logout
/// - `contacts`: grouped contact list and raw CSV download
/// - `email`: email stub
/// - `health`: health check endpoint

pub mod auth;
pub mod contacts;
pub mod email;
pub mod health;
pub mod pages;
