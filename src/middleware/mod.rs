//! HTTP middleware
//!
//! JWT authentication, role guards and CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
