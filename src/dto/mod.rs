//! Request and response bodies

pub mod auth_dto;
pub mod bin_dto;
pub mod common_dto;
pub mod credit_dto;
pub mod dashboard_dto;
pub mod inventory_dto;
pub mod order_dto;
pub mod settings_dto;
pub mod supply_house_dto;
pub mod truck_dto;
pub mod user_dto;
