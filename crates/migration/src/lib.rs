//! Migrator registering table migrations in foreign-key dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_customers;
mod m20240101_000002_create_vehicles;
mod m20240101_000003_create_employees;
mod m20240101_000004_create_service_categories;
mod m20240101_000005_create_services;
mod m20240101_000006_create_pending_services;
mod m20240101_000007_create_inventory;
mod m20240101_000008_create_inventory_usage;
mod m20240101_000009_create_service_ratings;
mod m20240101_000010_create_service_rating_links;
mod m20240101_000011_create_work_orders;
mod m20240101_000012_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_customers::Migration),
            Box::new(m20240101_000002_create_vehicles::Migration),
            Box::new(m20240101_000003_create_employees::Migration),
            Box::new(m20240101_000004_create_service_categories::Migration),
            Box::new(m20240101_000005_create_services::Migration),
            Box::new(m20240101_000006_create_pending_services::Migration),
            Box::new(m20240101_000007_create_inventory::Migration),
            Box::new(m20240101_000008_create_inventory_usage::Migration),
            Box::new(m20240101_000009_create_service_ratings::Migration),
            Box::new(m20240101_000010_create_service_rating_links::Migration),
            Box::new(m20240101_000011_create_work_orders::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000012_add_indexes::Migration),
        ]
    }
}
