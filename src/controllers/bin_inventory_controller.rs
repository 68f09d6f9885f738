//! Truck bin inventory
//!
//! Every operation resolves the effective technician first (see
//! `services::access_service`), then reads or writes the bin through a
//! `TruckBinStore`.

use serde_json::json;
use uuid::Uuid;

use crate::dto::bin_dto::{
    BinInventoryResponse, BinItemUpdateResponse, RemoveBinItemQuery, TruckSummary, UpsertBinItemRequest, BinSummary,
};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::truck::Truck;
use crate::models::truck_bin::{TruckBin, TruckBinOverview, TruckInventory};
use crate::models::user::UserRole;
use crate::repositories::truck_bin_repository::{BinItemUpsert, TruckBinStore};
use crate::services::access_service::authorize_truck_access;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::parse_uuid_param;

pub struct BinInventoryController<S: TruckBinStore> {
    store: S,
}

impl<S: TruckBinStore> BinInventoryController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the truck and resolves whose inventory the caller acts on
    async fn authorize(&self, caller: &AuthenticatedUser, truck_id: Uuid) -> Result<(Truck, Uuid), AppError> {
        let truck = self
            .store
            .find_truck(truck_id)
            .await?
            .ok_or_else(|| not_found_error("Truck", &truck_id.to_string()))?;

        let assignee = match (caller.role, truck.assigned_to) {
            (UserRole::Admin, Some(assigned_to)) => self.store.find_user(assigned_to).await?,
            _ => None,
        };

        let effective_user = authorize_truck_access(caller, &truck, assignee.as_ref())?;
        if effective_user != caller.user_id {
            tracing::debug!(admin = %caller.user_id, technician = %effective_user, truck = %truck.id, "acting on behalf of technician");
        }
        Ok((truck, effective_user))
    }

    async fn find_bin(&self, truck_id: Uuid, bin_id: Uuid) -> Result<TruckBin, AppError> {
        self.store
            .find_bin(truck_id, bin_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bin {} not found on truck {}", bin_id, truck_id)))
    }

    pub async fn list_bins(
        &self,
        caller: &AuthenticatedUser,
        truck_id: Uuid,
    ) -> Result<ApiResponse<Vec<TruckBinOverview>>, AppError> {
        self.authorize(caller, truck_id).await?;
        let bins = self.store.list_bins(truck_id).await?;
        Ok(ApiResponse::success(bins))
    }

    pub async fn get_bin(
        &self,
        caller: &AuthenticatedUser,
        truck_id: Uuid,
        bin_id: Uuid,
    ) -> Result<ApiResponse<BinInventoryResponse>, AppError> {
        let (truck, effective_user_id) = self.authorize(caller, truck_id).await?;
        let bin = self.find_bin(truck_id, bin_id).await?;
        let items = self.store.bin_items(truck_id, bin_id).await?;

        Ok(ApiResponse::success(BinInventoryResponse {
            truck: TruckSummary::from(&truck),
            bin,
            summary: BinSummary::from_items(&items),
            items,
            effective_user_id,
        }))
    }

    pub async fn upsert_item(
        &self,
        caller: &AuthenticatedUser,
        truck_id: Uuid,
        bin_id: Uuid,
        request: UpsertBinItemRequest,
    ) -> Result<ApiResponse<BinItemUpdateResponse>, AppError> {
        let (_, effective_user_id) = self.authorize(caller, truck_id).await?;
        self.find_bin(truck_id, bin_id).await?;

        let item_id = request
            .item_id
            .ok_or_else(|| AppError::BadRequest("itemId is required".to_string()))?;
        let quantity = request
            .quantity
            .ok_or_else(|| AppError::BadRequest("quantity is required".to_string()))?;

        if quantity < 0 {
            return Err(AppError::BadRequest("quantity cannot be negative".to_string()));
        }
        if request.min_quantity.map_or(false, |min| min < 0) || request.max_quantity.map_or(false, |max| max < 0) {
            return Err(AppError::BadRequest("Thresholds cannot be negative".to_string()));
        }
        if let (Some(min), Some(max)) = (request.min_quantity, request.max_quantity) {
            if min > max {
                return Err(AppError::BadRequest(
                    "minQuantity cannot be greater than maxQuantity".to_string(),
                ));
            }
        }

        if !self.store.item_exists(item_id).await? {
            return Err(not_found_error("Inventory item", &item_id.to_string()));
        }

        let item = self
            .store
            .upsert_item(BinItemUpsert {
                truck_id,
                bin_id,
                item_id,
                quantity,
                min_quantity: request.min_quantity,
                max_quantity: request.max_quantity,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            BinItemUpdateResponse { item, effective_user_id },
            "Bin item updated",
        ))
    }

    pub async fn remove_item(
        &self,
        caller: &AuthenticatedUser,
        truck_id: Uuid,
        bin_id: Uuid,
        query: RemoveBinItemQuery,
    ) -> Result<ApiResponse<TruckInventory>, AppError> {
        self.authorize(caller, truck_id).await?;
        self.find_bin(truck_id, bin_id).await?;

        let raw_item_id = query
            .item_id
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("itemId is required".to_string()))?;
        let item_id = parse_uuid_param("itemId", &raw_item_id)?;

        match self.store.remove_item(truck_id, bin_id, item_id).await? {
            Some(removed) => Ok(ApiResponse::success_with_message(removed, "Item removed from bin")),
            None => {
                let contents = self.store.bin_items(truck_id, bin_id).await?;
                let bin_contents: Vec<_> = contents
                    .iter()
                    .map(|item| json!({ "item_id": item.item_id, "sku": item.sku, "quantity": item.quantity }))
                    .collect();

                Err(AppError::NotFoundWithDetails {
                    message: "Item not found in bin".to_string(),
                    details: json!({
                        "requested_item_id": item_id,
                        "bin_contents": bin_contents,
                    }),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::models::truck_bin::BinItem;
    use crate::models::user::User;

    /// In-memory store keyed like the `truck_inventory` unique constraint
    #[derive(Default)]
    struct MemoryStore {
        trucks: HashMap<Uuid, Truck>,
        users: HashMap<Uuid, User>,
        bins: HashMap<Uuid, TruckBin>,
        catalog: HashMap<Uuid, (String, String)>,
        rows: Mutex<HashMap<(Uuid, Uuid, Uuid), TruckInventory>>,
    }

    #[async_trait]
    impl TruckBinStore for MemoryStore {
        async fn find_truck(&self, truck_id: Uuid) -> Result<Option<Truck>, AppError> {
            Ok(self.trucks.get(&truck_id).cloned())
        }

        async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
            Ok(self.users.get(&user_id).cloned())
        }

        async fn find_bin(&self, truck_id: Uuid, bin_id: Uuid) -> Result<Option<TruckBin>, AppError> {
            Ok(self.bins.get(&bin_id).filter(|bin| bin.truck_id == truck_id).cloned())
        }

        async fn item_exists(&self, item_id: Uuid) -> Result<bool, AppError> {
            Ok(self.catalog.contains_key(&item_id))
        }

        async fn bin_items(&self, truck_id: Uuid, bin_id: Uuid) -> Result<Vec<BinItem>, AppError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .values()
                .filter(|row| row.truck_id == truck_id && row.bin_id == bin_id)
                .map(|row| {
                    let (sku, name) = self.catalog[&row.item_id].clone();
                    BinItem {
                        item_id: row.item_id,
                        sku,
                        name,
                        category: "electrical".into(),
                        unit: "each".into(),
                        quantity: row.quantity,
                        min_quantity: row.min_quantity,
                        max_quantity: row.max_quantity,
                        unit_price: dec!(12.50),
                        last_restocked: row.last_restocked,
                    }
                })
                .collect())
        }

        async fn list_bins(&self, truck_id: Uuid) -> Result<Vec<TruckBinOverview>, AppError> {
            Ok(self
                .bins
                .values()
                .filter(|bin| bin.truck_id == truck_id)
                .map(|bin| TruckBinOverview {
                    id: bin.id,
                    truck_id,
                    bin_code: bin.bin_code.clone(),
                    name: bin.name.clone(),
                    location: None,
                    item_count: 0,
                    total_quantity: 0,
                    created_at: bin.created_at,
                })
                .collect())
        }

        async fn upsert_item(&self, upsert: BinItemUpsert) -> Result<TruckInventory, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let key = (upsert.truck_id, upsert.bin_id, upsert.item_id);
            let row = rows.entry(key).or_insert_with(|| TruckInventory {
                id: Uuid::new_v4(),
                truck_id: upsert.truck_id,
                bin_id: upsert.bin_id,
                item_id: upsert.item_id,
                quantity: 0,
                min_quantity: None,
                max_quantity: None,
                last_restocked: None,
                updated_at: Utc::now(),
            });
            row.quantity = upsert.quantity;
            row.min_quantity = upsert.min_quantity.or(row.min_quantity);
            row.max_quantity = upsert.max_quantity.or(row.max_quantity);
            row.last_restocked = Some(Utc::now());
            Ok(row.clone())
        }

        async fn remove_item(
            &self,
            truck_id: Uuid,
            bin_id: Uuid,
            item_id: Uuid,
        ) -> Result<Option<TruckInventory>, AppError> {
            Ok(self.rows.lock().unwrap().remove(&(truck_id, bin_id, item_id)))
        }
    }

    struct Fixture {
        controller: BinInventoryController<MemoryStore>,
        t1: Uuid,
        b1: Uuid,
        inv42: Uuid,
        u9: AuthenticatedUser,
    }

    fn caller(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: format!("{}@truxtok.com", role),
            name: role.to_string(),
            role,
        }
    }

    fn user(id: Uuid, role: &str, status: &str) -> User {
        User {
            id,
            name: "U9".into(),
            email: "u9@truxtok.com".into(),
            phone: None,
            password_hash: String::new(),
            role: role.into(),
            status: status.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn truck(id: Uuid, assigned_to: Option<Uuid>) -> Truck {
        Truck {
            id,
            truck_number: "T1".into(),
            status: "active".into(),
            assigned_to,
            license_plate: None,
            mileage: 0,
            last_maintenance_date: None,
            next_maintenance_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture() -> Fixture {
        let u9 = caller(UserRole::Technician);
        let (t1, b1, inv42) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut store = MemoryStore::default();
        store.trucks.insert(t1, truck(t1, Some(u9.user_id)));
        store.users.insert(u9.user_id, user(u9.user_id, "technician", "active"));
        store.bins.insert(
            b1,
            TruckBin {
                id: b1,
                truck_id: t1,
                bin_code: "B1".into(),
                name: "Front left".into(),
                location: None,
                created_at: Utc::now(),
            },
        );
        store.catalog.insert(inv42, ("INV-42".into(), "Capacitor 45/5 MFD".into()));

        Fixture {
            controller: BinInventoryController::new(store),
            t1,
            b1,
            inv42,
            u9,
        }
    }

    fn set_quantity(item_id: Uuid, quantity: i32) -> UpsertBinItemRequest {
        UpsertBinItemRequest {
            item_id: Some(item_id),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    fn remove(item_id: &str) -> RemoveBinItemQuery {
        RemoveBinItemQuery {
            item_id: Some(item_id.to_string()),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_the_quantity() {
        let f = fixture();

        f.controller.upsert_item(&f.u9, f.t1, f.b1, set_quantity(f.inv42, 5)).await.unwrap();
        let bin = f.controller.get_bin(&f.u9, f.t1, f.b1).await.unwrap().data.unwrap();
        assert_eq!(bin.items.len(), 1);
        assert_eq!(bin.items[0].quantity, 5);

        f.controller.upsert_item(&f.u9, f.t1, f.b1, set_quantity(f.inv42, 8)).await.unwrap();
        let bin = f.controller.get_bin(&f.u9, f.t1, f.b1).await.unwrap().data.unwrap();
        assert_eq!(bin.items.len(), 1);
        assert_eq!(bin.items[0].quantity, 8);
        assert_eq!(bin.summary.total_quantity, 8);
        assert_eq!(bin.effective_user_id, f.u9.user_id);
    }

    #[tokio::test]
    async fn other_technicians_are_forbidden() {
        let f = fixture();
        let stranger = caller(UserRole::Technician);

        let upsert = f.controller.upsert_item(&stranger, f.t1, f.b1, set_quantity(f.inv42, 1)).await;
        assert!(matches!(upsert, Err(AppError::Forbidden(ref m)) if m == "Truck not assigned to user"));

        let delete = f.controller.remove_item(&stranger, f.t1, f.b1, remove(&f.inv42.to_string())).await;
        assert!(matches!(delete, Err(AppError::Forbidden(_))));

        let read = f.controller.get_bin(&stranger, f.t1, f.b1).await;
        assert!(matches!(read, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn admin_acts_for_the_assigned_technician() {
        let f = fixture();
        let admin = caller(UserRole::Admin);

        let response = f
            .controller
            .upsert_item(&admin, f.t1, f.b1, set_quantity(f.inv42, 3))
            .await
            .unwrap();
        assert_eq!(response.data.unwrap().effective_user_id, f.u9.user_id);
    }

    #[tokio::test]
    async fn admin_on_unassigned_truck_is_forbidden() {
        let mut f = fixture();
        let admin = caller(UserRole::Admin);
        let t2 = Uuid::new_v4();
        f.controller.store.trucks.insert(t2, truck(t2, None));

        let result = f.controller.upsert_item(&admin, t2, f.b1, set_quantity(f.inv42, 3)).await;
        assert!(matches!(result, Err(AppError::Forbidden(ref m)) if m == "No technician assigned to truck"));
    }

    #[tokio::test]
    async fn admin_cannot_act_for_an_inactive_assignee() {
        let mut f = fixture();
        let admin = caller(UserRole::Admin);
        f.controller
            .store
            .users
            .insert(f.u9.user_id, user(f.u9.user_id, "technician", "suspended"));

        let result = f.controller.get_bin(&admin, f.t1, f.b1).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn invalid_bodies_are_rejected() {
        let f = fixture();

        let missing_item = UpsertBinItemRequest { quantity: Some(1), ..Default::default() };
        let result = f.controller.upsert_item(&f.u9, f.t1, f.b1, missing_item).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = f.controller.upsert_item(&f.u9, f.t1, f.b1, set_quantity(f.inv42, -1)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let inverted = UpsertBinItemRequest {
            min_quantity: Some(10),
            max_quantity: Some(2),
            ..set_quantity(f.inv42, 4)
        };
        let result = f.controller.upsert_item(&f.u9, f.t1, f.b1, inverted).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = f.controller.remove_item(&f.u9, f.t1, f.b1, RemoveBinItemQuery::default()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn unknown_item_or_bin_is_not_found() {
        let f = fixture();

        let result = f.controller.upsert_item(&f.u9, f.t1, f.b1, set_quantity(Uuid::new_v4(), 1)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = f.controller.get_bin(&f.u9, f.t1, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = f.controller.get_bin(&f.u9, Uuid::new_v4(), f.b1).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_a_missing_row_lists_the_bin() {
        let f = fixture();
        f.controller.upsert_item(&f.u9, f.t1, f.b1, set_quantity(f.inv42, 5)).await.unwrap();

        let missing = Uuid::new_v4();
        match f.controller.remove_item(&f.u9, f.t1, f.b1, remove(&missing.to_string())).await {
            Err(AppError::NotFoundWithDetails { details, .. }) => {
                assert_eq!(details["requested_item_id"], json!(missing));
                assert_eq!(details["bin_contents"][0]["sku"], "INV-42");
                assert_eq!(details["bin_contents"][0]["quantity"], 5);
            }
            other => panic!("expected NotFoundWithDetails, got {:?}", other.map(|_| ())),
        }

        let removed = f
            .controller
            .remove_item(&f.u9, f.t1, f.b1, remove(&f.inv42.to_string()))
            .await
            .unwrap();
        assert_eq!(removed.data.unwrap().quantity, 5);
        let bin = f.controller.get_bin(&f.u9, f.t1, f.b1).await.unwrap().data.unwrap();
        assert!(bin.items.is_empty());
    }
}
