//! Front-page numbers for the shop: open workload, staffing, today's
//! takings, plus short worklist and low-stock excerpts.
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use serde::Serialize;

use crate::errors::ServiceError;

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

#[derive(Debug, FromQueryResult)]
struct MoneyRow {
    total: f64,
}

/// Abbreviated worklist entry shown on the dashboard.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct WorklistEntry {
    pub id: i32,
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub service_name: String,
    pub client_name: String,
    pub status: String,
    pub entry_time: sea_orm::prelude::DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub name: String,
    pub quantity: i32,
    pub reorder_level: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub pending_vehicles: i64,
    pub active_employees: i64,
    pub avg_service_time: i64,
    pub daily_income: i64,
    pub pending_services: Vec<WorklistEntry>,
    pub low_stock_items: Vec<LowStockEntry>,
}

async fn count(db: &DatabaseConnection, sql: &str) -> Result<i64, ServiceError> {
    let row = CountRow::find_by_statement(Statement::from_sql_and_values(DbBackend::Postgres, sql, []))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(row.map(|r| r.total).unwrap_or(0))
}

pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats, ServiceError> {
    let pending_vehicles = count(
        db,
        "SELECT COUNT(*) AS total FROM pending_services WHERE status IN ('pending', 'in-progress')",
    )
    .await?;
    let active_employees =
        count(db, "SELECT COUNT(*) AS total FROM employees WHERE status = 'active'").await?;

    // average minutes between entry and the estimate, rounded to whole minutes
    let avg_service_time = count(
        db,
        r#"
        SELECT ROUND(COALESCE(
            AVG(EXTRACT(EPOCH FROM (estimated_completion_time - entry_time)) / 60), 0
        ))::int8 AS total
        FROM pending_services
        "#,
    )
    .await?;

    let daily_income = MoneyRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        SELECT COALESCE(SUM(total_cost), 0)::float8 AS total
        FROM work_orders
        WHERE DATE(start_date) = CURRENT_DATE
        "#,
        [],
    ))
    .one(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?
    .map(|r| r.total.round() as i64)
    .unwrap_or(0);

    let pending_services = WorklistEntry::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        SELECT
            ps.id,
            v.license_plate,
            v.make,
            v.model,
            s.name AS service_name,
            c.name AS client_name,
            ps.status,
            ps.entry_time
        FROM pending_services ps
        JOIN vehicles v ON ps.vehicle_id = v.id
        JOIN services s ON ps.service_type_id = s.id
        JOIN customers c ON v.customer_id = c.id
        WHERE ps.status IN ('pending', 'in-progress', 'delayed')
        ORDER BY ps.entry_time DESC
        LIMIT 5
        "#,
        [],
    ))
    .all(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let low_stock_items = LowStockEntry::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        SELECT name, quantity, reorder_level
        FROM inventory
        WHERE quantity <= reorder_level
        ORDER BY quantity::float8 / NULLIF(reorder_level, 0) ASC NULLS FIRST
        LIMIT 3
        "#,
        [],
    ))
    .all(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    Ok(DashboardStats {
        pending_vehicles,
        active_employees,
        avg_service_time,
        daily_income,
        pending_services,
        low_stock_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn stats_come_back_non_negative() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };
        let stats = dashboard_stats(&db).await?;
        assert!(stats.pending_vehicles >= 0);
        assert!(stats.active_employees >= 0);
        assert!(stats.avg_service_time >= 0);
        assert!(stats.pending_services.len() <= 5);
        assert!(stats.low_stock_items.len() <= 3);
        Ok(())
    }

    #[test]
    fn camel_case_wire_shape() {
        let stats = DashboardStats {
            pending_vehicles: 2,
            active_employees: 3,
            avg_service_time: 45,
            daily_income: 120,
            pending_services: vec![],
            low_stock_items: vec![],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["pendingVehicles"], 2);
        assert_eq!(json["dailyIncome"], 120);
        assert!(json["lowStockItems"].as_array().unwrap().is_empty());
    }
}
