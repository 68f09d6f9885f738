//! Services module
//!
//! Domain rules with no I/O: access resolution, order pricing and
//! commission, settings normalization, dashboard math and invoice rendering.

pub mod access_service;
pub mod commission_service;
pub mod dashboard_service;
pub mod invoice_service;
pub mod settings_service;
