//! Project configuration
//!
//! Environment variables and database pool setup.

pub mod database;
pub mod environment;

pub use environment::*;
