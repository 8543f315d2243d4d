use anyhow::Result;
use chrono::{NaiveDate, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::db::connect;
use crate::{customer, employee, inventory_item, pending_service, service_category, service_offer, vehicle};

/// Connect and migrate, or None when the environment has no database.
async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

#[tokio::test]
async fn customer_and_vehicle_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let created = customer::ActiveModel {
        name: Set("Ana Torres".into()),
        email: Set(Some("ana@example.com".into())),
        phone: Set("555-0101".into()),
        address: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert!(created.id > 0);
    assert_eq!(created.address, None);

    let found = customer::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|c| c.name.as_str()), Some("Ana Torres"));

    let v = vehicle::ActiveModel {
        customer_id: Set(created.id),
        make: Set("Toyota".into()),
        model: Set("Corolla".into()),
        year: Set(2019),
        license_plate: Set("ABC-123".into()),
        vin: Set(None),
        color: Set(Some("blue".into())),
        last_service_date: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let owned = vehicle::Entity::find()
        .filter(vehicle::Column::CustomerId.eq(created.id))
        .all(&db)
        .await?;
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].license_plate, "ABC-123");

    // Cascade removes the vehicle with its owner.
    customer::Entity::delete_by_id(created.id).exec(&db).await?;
    let gone = vehicle::Entity::find_by_id(v.id).one(&db).await?;
    assert!(gone.is_none());
    Ok(())
}

#[tokio::test]
async fn pending_service_insert_with_joined_parents() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let cust = customer::ActiveModel {
        name: Set("Luis Vega".into()),
        email: Set(None),
        phone: Set("555-0102".into()),
        address: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let veh = vehicle::ActiveModel {
        customer_id: Set(cust.id),
        make: Set("Honda".into()),
        model: Set("Civic".into()),
        year: Set(2021),
        license_plate: Set("XYZ-789".into()),
        vin: Set(None),
        color: Set(None),
        last_service_date: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let cat = service_category::ActiveModel {
        name: Set("Maintenance".into()),
        description: Set(None),
        created_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let offer = service_offer::ActiveModel {
        name: Set("Oil change".into()),
        description: Set(None),
        base_price: Set(35.0),
        estimated_hours: Set(Some(0.5)),
        category_id: Set(Some(cat.id)),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let emp = employee::ActiveModel {
        name: Set("Marta Ríos".into()),
        position: Set("Mechanic".into()),
        email: Set(None),
        phone: Set(None),
        hire_date: Set(NaiveDate::from_ymd_opt(2022, 3, 1).unwrap()),
        status: Set("active".into()),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let ps = pending_service::ActiveModel {
        vehicle_id: Set(veh.id),
        service_type_id: Set(offer.id),
        employee_id: Set(Some(emp.id)),
        entry_time: Set(now()),
        estimated_completion_time: Set(now()),
        status: Set(pending_service::STATUS_IN_PROGRESS.into()),
        notes: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert_eq!(ps.status, "in-progress");

    // cleanup bottom-up
    pending_service::Entity::delete_by_id(ps.id).exec(&db).await?;
    employee::Entity::delete_by_id(emp.id).exec(&db).await?;
    service_offer::Entity::delete_by_id(offer.id).exec(&db).await?;
    service_category::Entity::delete_by_id(cat.id).exec(&db).await?;
    customer::Entity::delete_by_id(cust.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn inventory_item_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let item = inventory_item::ActiveModel {
        name: Set("Oil Filter".into()),
        description: Set(None),
        category: Set("Parts".into()),
        quantity: Set(10),
        unit: Set("pcs".into()),
        cost_price: Set(3.0),
        selling_price: Set(7.0),
        reorder_level: Set(5),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert_eq!(item.quantity, 10);

    let mut am: inventory_item::ActiveModel = item.clone().into();
    am.quantity = Set(8);
    let updated = am.update(&db).await?;
    assert_eq!(updated.quantity, 8);

    inventory_item::Entity::delete_by_id(item.id).exec(&db).await?;
    let gone = inventory_item::Entity::find_by_id(item.id).one(&db).await?;
    assert!(gone.is_none());
    Ok(())
}
