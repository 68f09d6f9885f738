//! Controllers
//!
//! Request validation, authorization and orchestration of repositories and
//! services. Handlers in `routes` build a controller per request from the
//! shared pool.

pub mod auth_controller;
pub mod bin_inventory_controller;
pub mod credit_controller;
pub mod dashboard_controller;
pub mod inventory_controller;
pub mod order_controller;
pub mod settings_controller;
pub mod supply_house_controller;
pub mod truck_controller;
pub mod user_controller;
