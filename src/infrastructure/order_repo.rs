use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Address, NewAddress, NewOrder, Order, OrderItem, Payment};
use crate::domain::ports::{OrderMutation, OrderRepository};
use crate::schema::{addresses, order_items, orders, payments};

use super::models::{
    AddressRow, NewAddressRow, NewOrderItemRow, NewOrderRow, NewPaymentRow, OrderItemReturnChanges,
    OrderItemRow, OrderRow, PaymentRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Money columns ────────────────────────────────────────────────────────────

/// Goes through the shortest decimal rendering so `9.99` is stored as `9.99`
/// rather than its full binary expansion.
fn to_decimal(value: f64) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(&value.to_string())
        .map_err(|e| DomainError::InvalidInput(format!("Invalid amount '{}': {}", value, e)))
}

fn to_f64(value: &BigDecimal) -> Result<f64, DomainError> {
    f64::from_str(&value.to_string())
        .map_err(|e| DomainError::Internal(format!("Stored amount {} is unreadable: {}", value, e)))
}

// ── Aggregate assembly ───────────────────────────────────────────────────────

fn insert_address(conn: &mut PgConnection, address: &NewAddress) -> QueryResult<i32> {
    diesel::insert_into(addresses::table)
        .values(&NewAddressRow {
            state: &address.state,
            city: &address.city,
            postal_code: address.postal_code,
        })
        .returning(addresses::id)
        .get_result(conn)
}

fn address(rows: &HashMap<i32, AddressRow>, id: i32) -> Result<Address, DomainError> {
    let row = rows
        .get(&id)
        .ok_or_else(|| DomainError::Internal(format!("Address {} is missing", id)))?;
    Ok(Address {
        id: row.id,
        state: row.state.clone(),
        city: row.city.clone(),
        postal_code: row.postal_code,
    })
}

/// Loads the items, payments and addresses of `rows` and builds one `Order`
/// per row, keeping the row order.
fn load_aggregates(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let items_per_order = OrderItemRow::belonging_to(&rows)
        .select(OrderItemRow::as_select())
        .order(order_items::id.asc())
        .load(conn)?
        .grouped_by(&rows);

    let payment_ids: Vec<i32> = rows.iter().map(|o| o.payment_id).collect();
    let payments_by_id: HashMap<i32, PaymentRow> = payments::table
        .filter(payments::id.eq_any(payment_ids))
        .select(PaymentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let address_ids: Vec<i32> = rows
        .iter()
        .filter_map(|o| o.shipping_address_id)
        .chain(payments_by_id.values().map(|p| p.billing_address_id))
        .collect();
    let addresses_by_id: HashMap<i32, AddressRow> = addresses::table
        .filter(addresses::id.eq_any(address_ids))
        .select(AddressRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    rows.into_iter()
        .zip(items_per_order)
        .map(|(row, items)| -> Result<Order, DomainError> {
            let payment = payments_by_id.get(&row.payment_id).ok_or_else(|| {
                DomainError::Internal(format!("Payment {} is missing", row.payment_id))
            })?;
            let items = items
                .into_iter()
                .map(|i| -> Result<OrderItem, DomainError> {
                    Ok(OrderItem {
                        id: i.id,
                        price: to_f64(&i.price)?,
                        name: i.name,
                        quantity: i.quantity,
                        return_requested: i.return_requested,
                        return_reason: i.return_reason,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;

            Ok(Order {
                id: row.id,
                customer_id: row.customer_id,
                total: to_f64(&row.total)?,
                shipping_address: row
                    .shipping_address_id
                    .map(|id| address(&addresses_by_id, id))
                    .transpose()?,
                items,
                payment: Payment {
                    id: payment.id,
                    method: payment.method.clone(),
                    number: payment.number.clone(),
                    billing_address: address(&addresses_by_id, payment.billing_address_id)?,
                },
                created_at: row.created_at,
            })
        })
        .collect()
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Payment and the addresses it and the order point at
            let billing_address_id = insert_address(conn, &order.payment.billing_address)?;
            let payment_id: i32 = diesel::insert_into(payments::table)
                .values(&NewPaymentRow {
                    method: &order.payment.method,
                    number: order.payment.number.as_deref(),
                    billing_address_id,
                })
                .returning(payments::id)
                .get_result(conn)?;
            let shipping_address_id = order
                .shipping_address
                .as_ref()
                .map(|a| insert_address(conn, a))
                .transpose()?;

            // 2. The order itself
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    customer_id: order.customer_id,
                    total: to_decimal(order.total)?,
                    shipping_address_id,
                    payment_id,
                })
                .returning(orders::id)
                .get_result(conn)?;

            // 3. Items, linked through their order_id
            let new_items = order
                .items
                .iter()
                .map(|item| {
                    to_decimal(item.price).map(|price| NewOrderItemRow {
                        order_id,
                        name: &item.name,
                        quantity: item.quantity,
                        price,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        // One snapshot for the order row and its children, so a concurrent
        // delete can't leave us holding an order whose payment is gone.
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, DomainError, _>(|conn| {
                let rows = orders::table
                    .filter(orders::id.eq(id))
                    .select(OrderRow::as_select())
                    .load(conn)?;

                Ok(load_aggregates(conn, rows)?.pop())
            })
    }

    fn find_by_customer_id(&self, customer_id: i32) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, DomainError, _>(|conn| {
                let rows = orders::table
                    .filter(orders::customer_id.eq(customer_id))
                    .select(OrderRow::as_select())
                    .order(orders::id.asc())
                    .load(conn)?;

                load_aggregates(conn, rows)
            })
    }

    fn update(&self, id: i32, mutation: &mut OrderMutation<'_>) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Row lock keeps concurrent updates of the same order serialized.
            let rows = orders::table
                .filter(orders::id.eq(id))
                .select(OrderRow::as_select())
                .for_update()
                .load(conn)?;
            let Some(mut order) = load_aggregates(conn, rows)?.pop() else {
                return Ok(false);
            };

            mutation(&mut order)?;

            for item in &order.items {
                diesel::update(order_items::table.find(item.id))
                    .set(&OrderItemReturnChanges {
                        return_requested: item.return_requested,
                        return_reason: item.return_reason.as_deref(),
                    })
                    .execute(conn)?;
            }
            diesel::update(orders::table.find(id))
                .set(orders::updated_at.eq(Utc::now()))
                .execute(conn)?;

            Ok(true)
        })
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = orders::table
                .find(id)
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                return Ok(false);
            };
            let billing_address_id: i32 = payments::table
                .find(row.payment_id)
                .select(payments::billing_address_id)
                .first(conn)?;

            // order_items rows go with the order (ON DELETE CASCADE).
            diesel::delete(orders::table.find(row.id)).execute(conn)?;
            diesel::delete(payments::table.find(row.payment_id)).execute(conn)?;

            let address_ids: Vec<i32> = std::iter::once(billing_address_id)
                .chain(row.shipping_address_id)
                .collect();
            diesel::delete(addresses::table.filter(addresses::id.eq_any(address_ids)))
                .execute(conn)?;

            Ok(true)
        })
    }
}
