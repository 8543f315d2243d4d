//! Historical reporting: income and workload trends for charting.
//!
//! Shapes are chart-friendly and camelCase on the wire. All aggregates run
//! as raw SQL with explicit float8/int8 casts so they decode cleanly.
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use serde::Serialize;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct DailyIncomePoint {
    pub day: String,
    pub income: f64,
}

/// Share of workload per category, in percent.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ServiceTypeShare {
    pub name: String,
    pub value: f64,
}

/// Average minutes between entry and estimate, per category.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ServiceTimePoint {
    #[serde(rename = "type")]
    pub category: String,
    pub time: f64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct HistoryPoint {
    pub date: String,
    pub services: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_income: f64,
    pub daily_average: f64,
    pub best_day: String,
    pub total_services: i64,
    pub avg_service_time: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reports {
    pub daily_income_data: Vec<DailyIncomePoint>,
    pub service_type_data: Vec<ServiceTypeShare>,
    pub service_time_data: Vec<ServiceTimePoint>,
    pub vehicle_history_data: Vec<HistoryPoint>,
    pub summary_stats: SummaryStats,
}

fn stmt(sql: &str) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, [])
}

pub async fn build_reports(db: &DatabaseConnection) -> Result<Reports, ServiceError> {
    // income per weekday over the trailing week; day abbreviated to three
    // letters the way the charts expect
    let daily_income_data = DailyIncomePoint::find_by_statement(stmt(
        r#"
        SELECT
            TRIM(TO_CHAR(MAX(start_date), 'Dy')) AS day,
            COALESCE(SUM(total_cost), 0)::float8 AS income
        FROM work_orders
        WHERE start_date >= CURRENT_DATE - INTERVAL '7 days'
        GROUP BY DATE(start_date)
        ORDER BY DATE(start_date)
        "#,
    ))
    .all(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let service_type_data = ServiceTypeShare::find_by_statement(stmt(
        r#"
        SELECT
            sc.name,
            ROUND(COUNT(ps.id) * 100.0 / NULLIF((SELECT COUNT(*) FROM pending_services), 0), 2)::float8 AS value
        FROM pending_services ps
        JOIN services s ON ps.service_type_id = s.id
        JOIN service_categories sc ON s.category_id = sc.id
        GROUP BY sc.name
        ORDER BY value DESC
        "#,
    ))
    .all(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let service_time_data = ServiceTimePoint::find_by_statement(stmt(
        r#"
        SELECT
            sc.name AS category,
            ROUND(AVG(EXTRACT(EPOCH FROM (ps.estimated_completion_time - ps.entry_time)) / 60))::float8 AS time
        FROM pending_services ps
        JOIN services s ON ps.service_type_id = s.id
        JOIN service_categories sc ON s.category_id = sc.id
        GROUP BY sc.name
        ORDER BY sc.name
        "#,
    ))
    .all(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let vehicle_history_data = HistoryPoint::find_by_statement(stmt(
        r#"
        SELECT
            TO_CHAR(DATE(start_date), 'DD/MM') AS date,
            COUNT(id) AS services
        FROM work_orders
        WHERE start_date >= CURRENT_DATE - INTERVAL '30 days'
        GROUP BY DATE(start_date)
        ORDER BY DATE(start_date)
        LIMIT 6
        "#,
    ))
    .all(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let summary_stats = SummaryStats::find_by_statement(stmt(
        r#"
        SELECT
            (SELECT COALESCE(SUM(total_cost), 0)::float8 FROM work_orders) AS total_income,
            (SELECT ROUND(COALESCE(AVG(total_cost), 0), 2)::float8 FROM work_orders) AS daily_average,
            COALESCE((
                SELECT TRIM(TO_CHAR(day, 'Dy'))
                FROM (
                    SELECT DATE(start_date) AS day, SUM(total_cost) AS daily_total
                    FROM work_orders
                    GROUP BY DATE(start_date)
                    ORDER BY daily_total DESC
                    LIMIT 1
                ) best
            ), 'N/A') AS best_day,
            COUNT(*) AS total_services,
            ROUND(COALESCE(
                AVG(EXTRACT(EPOCH FROM (estimated_completion_time - entry_time)) / 60), 0
            ), 2)::float8 AS avg_service_time
        FROM pending_services
        "#,
    ))
    .one(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?
    .ok_or_else(|| ServiceError::Db("summary stats returned no row".into()))?;

    Ok(Reports {
        daily_income_data,
        service_type_data,
        service_time_data,
        vehicle_history_data,
        summary_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn reports_build_on_any_database_state() -> anyhow::Result<()> {
        let Some(db) = test_db().await else { return Ok(()) };
        let reports = build_reports(&db).await?;
        assert!(reports.vehicle_history_data.len() <= 6);
        assert!(reports.summary_stats.total_income >= 0.0);
        assert!(reports.summary_stats.total_services >= 0);
        for share in &reports.service_type_data {
            assert!(share.value >= 0.0 && share.value <= 100.0);
        }
        Ok(())
    }

    #[test]
    fn wire_shape_is_camel_case_with_type_alias() {
        let reports = Reports {
            daily_income_data: vec![DailyIncomePoint { day: "Mon".into(), income: 300.0 }],
            service_type_data: vec![],
            service_time_data: vec![ServiceTimePoint { category: "Engine".into(), time: 90.0 }],
            vehicle_history_data: vec![],
            summary_stats: SummaryStats {
                total_income: 300.0,
                daily_average: 300.0,
                best_day: "Mon".into(),
                total_services: 1,
                avg_service_time: 60.0,
            },
        };
        let json = serde_json::to_value(&reports).unwrap();
        assert_eq!(json["dailyIncomeData"][0]["day"], "Mon");
        assert_eq!(json["serviceTimeData"][0]["type"], "Engine");
        assert_eq!(json["summaryStats"]["bestDay"], "Mon");
    }
}
