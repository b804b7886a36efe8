//! Database model types for Diesel ORM.
//!
//! Decimals are stored as TEXT to keep exact scale; timestamps as RFC 3339.

use diesel::prelude::*;

use super::schema::{customer_address, customer_details, order_items, orders};

/// Insertable customer details; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = customer_details)]
pub struct NewCustomerRow {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Insertable customer address; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = customer_address)]
pub struct NewAddressRow {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Order header row. The id is caller-supplied.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub id: i64,
    pub order_type: String,
    pub customer_id: i64,
    pub address_id: i64,
    pub total_amount: String,
    pub currency: String,
    pub created_at: String,
}

/// Database row for an order item (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_per_unit: String,
    pub status: String,
}

/// Database row for an order item (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_per_unit: String,
    pub status: String,
}

/// Result of `SELECT last_insert_rowid()`.
#[derive(QueryableByName, Debug)]
pub struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub id: i64,
}
