use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::{addresses, order_items, orders, payments};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddressRow {
    pub id: i32,
    pub state: String,
    pub city: String,
    pub postal_code: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = addresses)]
pub struct NewAddressRow<'a> {
    pub state: &'a str,
    pub city: &'a str,
    pub postal_code: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: i32,
    pub method: String,
    pub number: Option<String>,
    pub billing_address_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow<'a> {
    pub method: &'a str,
    pub number: Option<&'a str>,
    pub billing_address_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub customer_id: i32,
    pub total: BigDecimal,
    pub shipping_address_id: Option<i32>,
    pub payment_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub customer_id: i32,
    pub total: BigDecimal,
    pub shipping_address_id: Option<i32>,
    pub payment_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub return_requested: bool,
    pub return_reason: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow<'a> {
    pub order_id: i32,
    pub name: &'a str,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = order_items)]
#[diesel(treat_none_as_null = true)]
pub struct OrderItemReturnChanges<'a> {
    pub return_requested: bool,
    pub return_reason: Option<&'a str>,
}
