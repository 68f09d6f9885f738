use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::order_dto::PricedOrderLine;
use crate::models::credit::{Credit, CreditStatus, CreditType};
use crate::models::order::{Order, OrderItemDetail, OrderOverview, OrderStatus};
use crate::repositories::{db_error, rollback};
use crate::utils::errors::AppError;

const SELECT_ORDER: &str = r#"
    SELECT id, order_number, technician_id, truck_id, supply_house_id, status, total_amount,
           commission_amount, total_credit, notes, created_at, confirmed_at, updated_at
    FROM orders
    WHERE id = $1
"#;

const OVERVIEW_SELECT: &str = r#"
    SELECT o.id, o.order_number, o.technician_id, u.name AS technician_name,
           o.truck_id, t.truck_number, o.supply_house_id, s.name AS supply_house_name,
           o.status, o.total_amount, o.commission_amount, o.total_credit, o.notes,
           (SELECT COUNT(*) FROM order_items oi WHERE oi.order_id = o.id) AS item_count,
           o.created_at, o.confirmed_at
    FROM orders o
    JOIN users u ON u.id = o.technician_id
    JOIN trucks t ON t.id = o.truck_id
    JOIN supply_houses s ON s.id = o.supply_house_id
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR o.status = $1)
      AND ($2::uuid IS NULL OR o.technician_id = $2)
"#;

const SELECT_ITEMS: &str = r#"
    SELECT oi.id, oi.order_id, oi.item_id, ii.sku, ii.name, oi.bin_id,
           oi.quantity, oi.unit_price, oi.total_price
    FROM order_items oi
    JOIN inventory_items ii ON ii.id = oi.item_id
    WHERE oi.order_id = $1
    ORDER BY ii.sku
"#;

const INSERT_ORDER: &str = r#"
    INSERT INTO orders (id, order_number, technician_id, truck_id, supply_house_id, status,
                        total_amount, commission_amount, total_credit, notes, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, 'pending', $6, 0, 0, $7, NOW(), NOW())
    RETURNING id, order_number, technician_id, truck_id, supply_house_id, status, total_amount,
              commission_amount, total_credit, notes, created_at, confirmed_at, updated_at
"#;

const INSERT_ITEM: &str = r#"
    INSERT INTO order_items (id, order_id, item_id, bin_id, quantity, unit_price, total_price)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

const CONFIRM_ORDER: &str = r#"
    UPDATE orders
    SET status = 'confirmed',
        commission_amount = $2,
        total_credit = $3,
        confirmed_at = NOW(),
        updated_at = NOW()
    WHERE id = $1 AND status = 'pending'
    RETURNING id, order_number, technician_id, truck_id, supply_house_id, status, total_amount,
              commission_amount, total_credit, notes, created_at, confirmed_at, updated_at
"#;

const INSERT_CREDIT: &str = r#"
    INSERT INTO credits (id, technician_id, order_id, credit_type, amount, status, description, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
    RETURNING id, technician_id, order_id, credit_type, amount, status, description, created_at
"#;

const UPDATE_STATUS: &str = r#"
    UPDATE orders
    SET status = $3, updated_at = NOW()
    WHERE id = $1 AND status = $2
    RETURNING id, order_number, technician_id, truck_id, supply_house_id, status, total_amount,
              commission_amount, total_credit, notes, created_at, confirmed_at, updated_at
"#;

#[derive(Debug)]
pub struct NewOrder {
    pub order_number: String,
    pub technician_id: Uuid,
    pub truck_id: Uuid,
    pub supply_house_id: Uuid,
    pub total_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub technician_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>(SELECT_ORDER)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find order", SELECT_ORDER))
    }

    pub async fn find_overview(&self, id: Uuid) -> Result<Option<OrderOverview>, AppError> {
        let sql = format!("{} WHERE o.id = $1", OVERVIEW_SELECT);
        sqlx::query_as::<_, OrderOverview>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find order overview", OVERVIEW_SELECT))
    }

    pub async fn list(&self, query: &OrderQuery) -> Result<(Vec<OrderOverview>, i64), AppError> {
        let status = query.status.map(|s| s.as_str());

        let sql = format!(
            "{} {} ORDER BY o.created_at DESC LIMIT $3 OFFSET $4",
            OVERVIEW_SELECT, LIST_FILTER
        );
        let orders = sqlx::query_as::<_, OrderOverview>(&sql)
            .bind(status)
            .bind(query.technician_id)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list orders", LIST_FILTER))?;

        let count_sql = format!("SELECT COUNT(*) FROM orders o {}", LIST_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(status)
            .bind(query.technician_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count orders", LIST_FILTER))?;

        Ok((orders, total))
    }

    pub async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItemDetail>, AppError> {
        sqlx::query_as::<_, OrderItemDetail>(SELECT_ITEMS)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list order items", SELECT_ITEMS))
    }

    /// Inserts the order header and all its lines in one transaction
    pub async fn create_with_items(&self, order: NewOrder, lines: &[PricedOrderLine]) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;
        let order_id = Uuid::new_v4();

        let created = match sqlx::query_as::<_, Order>(INSERT_ORDER)
            .bind(order_id)
            .bind(&order.order_number)
            .bind(order.technician_id)
            .bind(order.truck_id)
            .bind(order.supply_house_id)
            .bind(order.total_amount)
            .bind(order.notes.as_deref())
            .fetch_one(&mut *tx)
            .await
        {
            Ok(created) => created,
            Err(e) => {
                let error = db_error("create order", INSERT_ORDER)(e);
                rollback(tx, "create order").await;
                return Err(error);
            }
        };

        for line in lines {
            let inserted = sqlx::query(INSERT_ITEM)
                .bind(Uuid::new_v4())
                .bind(order_id)
                .bind(line.item_id)
                .bind(line.bin_id)
                .bind(line.quantity)
                .bind(line.unit_price)
                .bind(line.total_price)
                .execute(&mut *tx)
                .await;

            if let Err(e) = inserted {
                let error = db_error("create order item", INSERT_ITEM)(e);
                rollback(tx, "create order item").await;
                return Err(error);
            }
        }

        tx.commit().await?;
        log::info!(
            "🧾 Order {} created with {} lines ({})",
            created.order_number,
            lines.len(),
            created.total_amount
        );
        Ok(created)
    }

    /// Confirms a pending order and issues the technician credit.
    ///
    /// Returns `None` if the order is no longer pending. No credit row is
    /// written when `total_credit` is zero.
    pub async fn confirm(
        &self,
        id: Uuid,
        commission_amount: Decimal,
        total_credit: Decimal,
    ) -> Result<Option<(Order, Option<Credit>)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let confirmed = match sqlx::query_as::<_, Order>(CONFIRM_ORDER)
            .bind(id)
            .bind(commission_amount)
            .bind(total_credit)
            .fetch_optional(&mut *tx)
            .await
        {
            Ok(Some(order)) => order,
            Ok(None) => {
                rollback(tx, "confirm order").await;
                return Ok(None);
            }
            Err(e) => {
                let error = db_error("confirm order", CONFIRM_ORDER)(e);
                rollback(tx, "confirm order").await;
                return Err(error);
            }
        };

        let mut credit = None;
        if total_credit > Decimal::ZERO {
            let inserted = sqlx::query_as::<_, Credit>(INSERT_CREDIT)
                .bind(Uuid::new_v4())
                .bind(confirmed.technician_id)
                .bind(confirmed.id)
                .bind(CreditType::Earned.as_str())
                .bind(total_credit)
                .bind(CreditStatus::Available.as_str())
                .bind(format!("Credit for order {}", confirmed.order_number))
                .fetch_one(&mut *tx)
                .await;

            match inserted {
                Ok(row) => credit = Some(row),
                Err(e) => {
                    let error = db_error("issue order credit", INSERT_CREDIT)(e);
                    rollback(tx, "issue order credit").await;
                    return Err(error);
                }
            }
        }

        tx.commit().await?;
        log::info!(
            "✅ Order {} confirmed: commission {}, credit {}",
            confirmed.order_number, commission_amount, total_credit
        );
        Ok(Some((confirmed, credit)))
    }

    /// Moves the order from `from` to `to`; `None` if it was not in `from` anymore
    pub async fn update_status(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>(UPDATE_STATUS)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update order status", UPDATE_STATUS))
    }

    pub async fn order_number_exists(&self, order_number: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE order_number = $1)")
            .bind(order_number)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_RETURNING: &str = "id, order_number, technician_id, truck_id, supply_house_id, status, total_amount, commission_amount, total_credit, notes, created_at, confirmed_at, updated_at";

    #[test]
    fn every_statement_returns_full_rows() {
        for statement in [SELECT_ORDER, INSERT_ORDER, CONFIRM_ORDER, UPDATE_STATUS] {
            for column in ORDER_RETURNING.split(", ") {
                assert!(statement.contains(column), "{} missing from statement", column);
            }
        }
    }
}
