//! SQLite order store implementation.
//!
//! Every call runs on the blocking pool. Duplicate ids surface as a primary
//! key violation on `orders`, which is mapped to [`StoreError::Duplicate`].

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rust_decimal::Decimal;
use tracing::warn;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    LastInsertRowId, NewAddressRow, NewCustomerRow, NewOrderItemRow, OrderItemRow, OrderRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    customer_address, customer_details, order_items, orders,
};
use crate::domain::id::{AddressId, CustomerId, OrderId};
use crate::domain::order::{
    CustomerAddress, CustomerDetails, ItemStatus, OrderItem, OrderRequest, OrderType,
    PersistedOrder,
};
use crate::error::StoreError;
use crate::port::outbound::store::OrderStore;

/// SQLite-backed order store.
#[derive(Clone)]
pub struct SqliteOrderStore {
    pool: DbPool,
}

impl SqliteOrderStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run `op` on a pooled connection off the async runtime.
    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            op(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("storage task failed: {e}")))?
    }

    fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, DieselError> {
        diesel::sql_query("SELECT last_insert_rowid() AS id")
            .get_result::<LastInsertRowId>(conn)
            .map(|row| row.id)
    }

    fn to_order_row(
        request: &OrderRequest,
        order_type: OrderType,
        customer_id: CustomerId,
        address_id: AddressId,
        created_at: DateTime<Utc>,
    ) -> OrderRow {
        OrderRow {
            id: request.id.value(),
            order_type: order_type.as_str().to_string(),
            customer_id: customer_id.value(),
            address_id: address_id.value(),
            total_amount: request.total_amount.to_string(),
            currency: request.currency.clone(),
            created_at: created_at.to_rfc3339(),
        }
    }

    fn to_item_row(item: &OrderItem) -> NewOrderItemRow {
        NewOrderItemRow {
            order_id: item.order_id.value(),
            product_id: item.product_id,
            quantity: item.quantity,
            price_per_unit: item.price_per_unit.to_string(),
            status: item.status.as_str().to_string(),
        }
    }

    fn from_rows(row: OrderRow, items: Vec<OrderItemRow>) -> Result<PersistedOrder, StoreError> {
        let order_type = OrderType::from_str(&row.order_type)
            .map_err(|e| StoreError::Corrupt(format!("order {}: {e}", row.id)))?;
        let total_amount = parse_decimal(row.id, "total_amount", &row.total_amount)?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| StoreError::Corrupt(format!("order {} created_at: {e}", row.id)))?
            .with_timezone(&Utc);

        let items = items
            .into_iter()
            .map(|item| {
                let status = ItemStatus::parse_lenient(&item.status).unwrap_or_else(|| {
                    warn!(
                        order_id = item.order_id,
                        status = %item.status,
                        "Unknown item status, treating as processing"
                    );
                    ItemStatus::default()
                });
                Ok(OrderItem {
                    order_id: OrderId::new(item.order_id),
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price_per_unit: parse_decimal(row.id, "price_per_unit", &item.price_per_unit)?,
                    status,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(PersistedOrder {
            id: OrderId::new(row.id),
            order_type,
            customer_id: CustomerId::new(row.customer_id),
            address_id: AddressId::new(row.address_id),
            total_amount,
            currency: row.currency,
            created_at,
            items,
        })
    }
}

fn parse_decimal(order_id: i64, field: &str, raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw)
        .map_err(|e| StoreError::Corrupt(format!("order {order_id} {field}: {e}")))
}

fn unavailable(err: DieselError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn save_customer(&self, details: &CustomerDetails) -> Result<CustomerId, StoreError> {
        let row = NewCustomerRow {
            name: details.name.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
        };
        self.with_conn(move |conn| {
            conn.immediate_transaction(|conn| {
                diesel::insert_into(customer_details::table)
                    .values(&row)
                    .execute(conn)?;
                Self::last_insert_rowid(conn)
            })
            .map(CustomerId::new)
            .map_err(unavailable)
        })
        .await
    }

    async fn save_address(&self, address: &CustomerAddress) -> Result<AddressId, StoreError> {
        let row = NewAddressRow {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
        };
        self.with_conn(move |conn| {
            conn.immediate_transaction(|conn| {
                diesel::insert_into(customer_address::table)
                    .values(&row)
                    .execute(conn)?;
                Self::last_insert_rowid(conn)
            })
            .map(AddressId::new)
            .map_err(unavailable)
        })
        .await
    }

    async fn save_order(
        &self,
        request: &OrderRequest,
        order_type: OrderType,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<PersistedOrder, StoreError> {
        let created_at = Utc::now();
        let order = PersistedOrder {
            id: request.id,
            order_type,
            customer_id,
            address_id,
            total_amount: request.total_amount,
            currency: request.currency.clone(),
            created_at,
            items: request
                .items
                .iter()
                .map(|item| OrderItem::from_request(request.id, item))
                .collect(),
        };
        let order_row = Self::to_order_row(request, order_type, customer_id, address_id, created_at);
        let item_rows: Vec<NewOrderItemRow> = order.items.iter().map(Self::to_item_row).collect();
        let order_id = request.id;

        self.with_conn(move |conn| {
            conn.immediate_transaction(|conn| {
                diesel::insert_into(orders::table)
                    .values(&order_row)
                    .execute(conn)?;
                if !item_rows.is_empty() {
                    diesel::insert_into(order_items::table)
                        .values(&item_rows)
                        .execute(conn)?;
                }
                Ok::<_, DieselError>(())
            })
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::Duplicate(order_id)
                }
                other => unavailable(other),
            })
        })
        .await?;

        Ok(order)
    }

    async fn find_order(&self, order_id: OrderId) -> Result<Option<PersistedOrder>, StoreError> {
        self.with_conn(move |conn| {
            let row: Option<OrderRow> = orders::table
                .find(order_id.value())
                .select(OrderRow::as_select())
                .first(conn)
                .optional()
                .map_err(unavailable)?;
            let Some(row) = row else {
                return Ok(None);
            };

            let items: Vec<OrderItemRow> = order_items::table
                .filter(order_items::order_id.eq(order_id.value()))
                .order(order_items::id.asc())
                .select(OrderItemRow::as_select())
                .load(conn)
                .map_err(unavailable)?;

            Self::from_rows(row, items).map(Some)
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            diesel::sql_query("SELECT 1")
                .execute(conn)
                .map(|_| ())
                .map_err(unavailable)
        })
        .await
    }
}
