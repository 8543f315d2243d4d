use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;

use models::employee::{self, Entity as EmployeeEntity};

use crate::{contains_ci, errors::ServiceError, UpdateOutcome};

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl UpdateEmployee {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.position.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.hire_date.is_none()
            && self.status.is_none()
    }
}

pub async fn list_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>, ServiceError> {
    EmployeeEntity::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_employee(db: &DatabaseConnection, id: i32) -> Result<Option<employee::Model>, ServiceError> {
    EmployeeEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn search_employees(db: &DatabaseConnection, term: &str) -> Result<Vec<employee::Model>, ServiceError> {
    EmployeeEntity::find()
        .filter(
            Condition::any()
                .add(contains_ci((employee::Entity, employee::Column::Name), term))
                .add(contains_ci((employee::Entity, employee::Column::Position), term))
                .add(contains_ci((employee::Entity, employee::Column::Email), term))
                .add(contains_ci((employee::Entity, employee::Column::Phone), term)),
        )
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_employee(db: &DatabaseConnection, input: NewEmployee) -> Result<employee::Model, ServiceError> {
    employee::validate_status(&input.status)?;
    let now = Utc::now().into();
    let am = employee::ActiveModel {
        name: Set(input.name),
        position: Set(input.position),
        email: Set(input.email),
        phone: Set(input.phone),
        hire_date: Set(input.hire_date),
        status: Set(input.status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_employee(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateEmployee,
) -> Result<UpdateOutcome<employee::Model>, ServiceError> {
    if input.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }
    if let Some(s) = input.status.as_deref() {
        employee::validate_status(s)?;
    }
    let existing = EmployeeEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("employee"))?;
    let mut am: employee::ActiveModel = existing.into();
    if let Some(v) = input.name {
        am.name = Set(v);
    }
    if let Some(v) = input.position {
        am.position = Set(v);
    }
    if let Some(v) = input.email {
        am.email = Set(Some(v));
    }
    if let Some(v) = input.phone {
        am.phone = Set(Some(v));
    }
    if let Some(v) = input.hire_date {
        am.hire_date = Set(v);
    }
    if let Some(v) = input.status {
        am.status = Set(v);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(UpdateOutcome::Updated(updated))
}

/// Flip an employee between `active` and `inactive`.
pub async fn change_employee_status(
    db: &DatabaseConnection,
    id: i32,
    status: &str,
) -> Result<employee::Model, ServiceError> {
    employee::validate_status(status)?;
    let existing = EmployeeEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("employee"))?;
    let mut am: employee::ActiveModel = existing.into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn delete_employee(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = EmployeeEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
