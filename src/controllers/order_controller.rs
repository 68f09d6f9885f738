use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, PaginatedResponse};
use crate::dto::order_dto::{
    CreateOrderRequest, OrderConfirmationResponse, OrderDetailResponse, OrderFilters, UpdateOrderStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::order::{Order, OrderOverview, OrderStatus};
use crate::models::user::UserRole;
use crate::repositories::inventory_repository::InventoryRepository;
use crate::repositories::order_repository::{NewOrder, OrderQuery, OrderRepository};
use crate::repositories::settings_repository::SettingsRepository;
use crate::repositories::supply_house_repository::SupplyHouseRepository;
use crate::repositories::truck_repository::TruckRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::access_service::{authorize_truck_access, ensure_owner_or_view_all, technician_scope};
use crate::services::commission_service::{generate_order_number, price_lines, OrderAccounting};
use crate::services::invoice_service::{invoice_filename, render_invoice};
use crate::services::settings_service::{document_from_rows, CommissionRates};
use crate::utils::errors::{not_found_error, AppError};

pub struct OrderController {
    orders: OrderRepository,
    trucks: TruckRepository,
    users: UserRepository,
    supply_houses: SupplyHouseRepository,
    inventory: InventoryRepository,
    settings: SettingsRepository,
}

/// Rendered invoice ready to send
pub struct InvoiceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl OrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool.clone()),
            trucks: TruckRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            supply_houses: SupplyHouseRepository::new(pool.clone()),
            inventory: InventoryRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool),
        }
    }

    async fn find_order(&self, id: Uuid) -> Result<Order, AppError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Order", &id.to_string()))
    }

    async fn find_overview(&self, id: Uuid) -> Result<OrderOverview, AppError> {
        self.orders
            .find_overview(id)
            .await?
            .ok_or_else(|| not_found_error("Order", &id.to_string()))
    }

    async fn commission_rates(&self) -> Result<CommissionRates, AppError> {
        let rows = self.settings.all().await?;
        Ok(CommissionRates::from_document(&document_from_rows(&rows)))
    }

    pub async fn list(
        &self,
        caller: &AuthenticatedUser,
        filters: OrderFilters,
    ) -> Result<PaginatedResponse<OrderOverview>, AppError> {
        let page = filters.page_request();
        let query = OrderQuery {
            status: filters.status,
            technician_id: technician_scope(caller, filters.technician_id)?,
            limit: page.limit,
            offset: page.offset(),
        };

        let (orders, total) = self.orders.list(&query).await?;
        Ok(PaginatedResponse::new(orders, page, total))
    }

    pub async fn get(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<OrderDetailResponse>, AppError> {
        let order = self.find_overview(id).await?;
        ensure_owner_or_view_all(caller, order.technician_id)?;

        let items = self.orders.items(id).await?;
        Ok(ApiResponse::success(OrderDetailResponse { order, items }))
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateOrderRequest,
    ) -> Result<ApiResponse<OrderDetailResponse>, AppError> {
        request.validate_all()?;

        let truck = self
            .trucks
            .find_by_id(request.truck_id)
            .await?
            .ok_or_else(|| not_found_error("Truck", &request.truck_id.to_string()))?;

        let assignee = match (caller.role, truck.assigned_to) {
            (UserRole::Admin, Some(assigned_to)) => self.users.find_by_id(assigned_to).await?,
            _ => None,
        };
        let technician_id = authorize_truck_access(caller, &truck, assignee.as_ref())?;

        let supply_house = self
            .supply_houses
            .find_by_id(request.supply_house_id)
            .await?
            .ok_or_else(|| not_found_error("Supply house", &request.supply_house_id.to_string()))?;
        if !supply_house.is_active {
            return Err(AppError::BadRequest(format!(
                "Supply house '{}' is not active",
                supply_house.name
            )));
        }

        let truck_bins: HashSet<Uuid> = self.trucks.list_bins(truck.id).await?.into_iter().map(|b| b.id).collect();
        if let Some(line) = request
            .items
            .iter()
            .find(|line| line.bin_id.map_or(false, |bin_id| !truck_bins.contains(&bin_id)))
        {
            return Err(AppError::BadRequest(format!(
                "Bin {} does not belong to truck {}",
                line.bin_id.unwrap_or_default(),
                truck.truck_number
            )));
        }

        let item_ids: Vec<Uuid> = request.items.iter().map(|line| line.item_id).collect();
        let catalog = self.inventory.find_many(&item_ids).await?;
        let (lines, total_amount) = price_lines(&request.items, &catalog)?;

        let mut order_number = generate_order_number(Utc::now());
        while self.orders.order_number_exists(&order_number).await? {
            order_number = generate_order_number(Utc::now());
        }

        let order = self
            .orders
            .create_with_items(
                NewOrder {
                    order_number,
                    technician_id,
                    truck_id: truck.id,
                    supply_house_id: supply_house.id,
                    total_amount,
                    notes: request.notes.filter(|n| !n.trim().is_empty()),
                },
                &lines,
            )
            .await?;

        let overview = self.find_overview(order.id).await?;
        let items = self.orders.items(order.id).await?;
        Ok(ApiResponse::success_with_message(
            OrderDetailResponse { order: overview, items },
            "Order created",
        ))
    }

    pub async fn confirm(&self, id: Uuid) -> Result<ApiResponse<OrderConfirmationResponse>, AppError> {
        let order = self.find_order(id).await?;
        if order.status() != Some(OrderStatus::Pending) {
            return Err(AppError::Conflict(format!(
                "Only pending orders can be confirmed (order is {})",
                order.status
            )));
        }

        let rates = self.commission_rates().await?;
        let accounting = OrderAccounting::for_total(order.total_amount, &rates);

        let (confirmed, credit) = self
            .orders
            .confirm(id, accounting.commission_amount, accounting.total_credit)
            .await?
            .ok_or_else(|| AppError::Conflict("Order was modified concurrently".to_string()))?;

        Ok(ApiResponse::success_with_message(
            OrderConfirmationResponse {
                order_id: confirmed.id,
                status: OrderStatus::Confirmed,
                total_amount: confirmed.total_amount,
                commission_amount: confirmed.commission_amount,
                total_credit: confirmed.total_credit,
                credit_id: credit.map(|c| c.id),
            },
            "Order confirmed",
        ))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<Order>, AppError> {
        if request.status == OrderStatus::Confirmed {
            self.confirm(id).await?;
            let order = self.find_order(id).await?;
            return Ok(ApiResponse::success_with_message(order, "Order confirmed"));
        }

        let order = self.find_order(id).await?;
        let current = order
            .status()
            .ok_or_else(|| AppError::Internal(format!("Order {} has unknown status '{}'", id, order.status)))?;

        if !current.can_transition_to(request.status) {
            return Err(AppError::Conflict(format!(
                "Cannot move order from {} to {}",
                current, request.status
            )));
        }

        let updated = self
            .orders
            .update_status(id, current, request.status)
            .await?
            .ok_or_else(|| AppError::Conflict("Order was modified concurrently".to_string()))?;

        log::info!("📦 Order {} moved from {} to {}", updated.order_number, current, request.status);
        Ok(ApiResponse::success_with_message(updated, "Order status updated"))
    }

    pub async fn invoice(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<InvoiceDocument, AppError> {
        let order = self.find_overview(id).await?;
        ensure_owner_or_view_all(caller, order.technician_id)?;

        let items = self.orders.items(id).await?;
        Ok(InvoiceDocument {
            filename: invoice_filename(&order.order_number),
            bytes: render_invoice(&order, &items),
        })
    }
}
