//! Service layer providing business-oriented operations on top of models.
//! - Per-entity CRUD and search
//! - The pending-service workflow and rating links
//! - Inventory with transactional stock usage
//! - Read-only dashboard/report aggregation

pub mod errors;
#[cfg(test)]
pub mod test_support;

pub mod customers;
pub mod vehicles;
pub mod employees;
pub mod service_offers;
pub mod pending_services;
pub mod inventory;
pub mod ratings;
pub mod rating_links;
pub mod dashboard;
pub mod reports;

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};

/// Outcome of a partial update.
///
/// `NothingToUpdate` means the input carried zero updatable fields; the
/// database is not touched in that case, and callers surface it separately
/// from "not found".
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    Updated(T),
    NothingToUpdate,
}

impl<T> UpdateOutcome<T> {
    pub fn updated(self) -> Option<T> {
        match self {
            UpdateOutcome::Updated(v) => Some(v),
            UpdateOutcome::NothingToUpdate => None,
        }
    }
}

/// Case-insensitive substring match usable on joined columns.
pub(crate) fn contains_ci(col: impl IntoColumnRef, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(format!("%{}%", term.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_outcome_accessor() {
        assert_eq!(UpdateOutcome::Updated(7).updated(), Some(7));
        assert_eq!(UpdateOutcome::<i32>::NothingToUpdate.updated(), None);
    }
}
