//! TruXtoK API
//!
//! Fleet and inventory backend for field technicians: trucks and their bins,
//! supply-house orders, commissions and technician credits.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
