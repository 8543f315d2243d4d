pub mod errors;
pub mod db;
pub mod customer;
pub mod vehicle;
pub mod employee;
pub mod service_category;
pub mod service_offer;
pub mod pending_service;
pub mod inventory_item;
pub mod inventory_usage;
pub mod service_rating;
pub mod service_rating_link;
pub mod work_order;

#[cfg(test)]
mod tests;
