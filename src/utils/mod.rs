//! System utilities
//!
//! Error handling, JWT helpers and validation shared by every layer.

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod validation;
