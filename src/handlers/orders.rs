use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::order_service::OrderService;
use crate::domain::order::{
    Address, AddressDraft, ItemReturn, Order, OrderDraft, OrderItem, OrderItemDraft, Payment,
    PaymentDraft,
};
use crate::errors::AppError;

// ── Request DTOs ─────────────────────────────────────────────────────────────
//
// Every field is optional on the wire, and an explicit `null` reads the same
// as a missing key. Absent numbers become 0 and absent lists become empty;
// the validator decides what is actually required.

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub method: Option<String>,
    pub number: Option<String>,
    pub billing_address: Option<AddressRequest>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Option<i32>,
    pub total: Option<f64>,
    pub shipping_address: Option<AddressRequest>,
    pub items: Option<Vec<OrderItemRequest>>,
    pub payment: Option<PaymentRequest>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub order_id: Option<i32>,
    pub item_id: Option<i32>,
    pub reason: Option<String>,
}

impl From<AddressRequest> for AddressDraft {
    fn from(a: AddressRequest) -> Self {
        AddressDraft {
            state: a.state,
            city: a.city,
            postal_code: a.postal_code.unwrap_or_default(),
        }
    }
}

impl From<CreateOrderRequest> for OrderDraft {
    fn from(body: CreateOrderRequest) -> Self {
        OrderDraft {
            customer_id: body.customer_id,
            total: body.total.unwrap_or_default(),
            shipping_address: body.shipping_address.map(AddressDraft::from),
            items: body
                .items
                .unwrap_or_default()
                .into_iter()
                .map(|i| OrderItemDraft {
                    name: i.name,
                    quantity: i.quantity.unwrap_or_default(),
                    price: i.price.unwrap_or_default(),
                })
                .collect(),
            payment: body.payment.map(|p| PaymentDraft {
                method: p.method,
                number: p.number,
                billing_address: p.billing_address.map(AddressDraft::from),
            }),
        }
    }
}

impl From<ReturnRequest> for ItemReturn {
    fn from(body: ReturnRequest) -> Self {
        ItemReturn {
            order_id: body.order_id.unwrap_or_default(),
            item_id: body.item_id.unwrap_or_default(),
            reason: body.reason,
        }
    }
}

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: i32,
    pub state: String,
    pub city: String,
    pub postal_code: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: i32,
    pub method: String,
    pub number: Option<String>,
    pub billing_address: AddressResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub return_requested: bool,
    pub return_reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub customer_id: i32,
    pub total: f64,
    pub shipping_address: Option<AddressResponse>,
    pub items: Vec<OrderItemResponse>,
    pub payment: PaymentResponse,
    pub created_at: String,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        AddressResponse {
            id: a.id,
            state: a.state,
            city: a.city,
            postal_code: a.postal_code,
        }
    }
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        PaymentResponse {
            id: p.id,
            method: p.method,
            number: p.number,
            billing_address: p.billing_address.into(),
        }
    }
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        OrderItemResponse {
            id: i.id,
            name: i.name,
            quantity: i.quantity,
            price: i.price,
            return_requested: i.return_requested,
            return_reason: i.return_reason,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            customer_id: o.customer_id,
            total: o.total,
            shipping_address: o.shipping_address.map(AddressResponse::from),
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
            payment: o.payment.into(),
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Validates the order and stores it together with its items, payment and
/// addresses. Responds with the id assigned to the new order.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Order failed validation"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = OrderDraft::from(body.into_inner());

    let id = web::block(move || service.create_order(draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CreateOrderResponse { id }))
}

/// GET /orders/{customer_id}
#[utoipa::path(
    get,
    path = "/orders/{customer_id}",
    params(
        ("customer_id" = i32, Path, description = "Customer id"),
    ),
    responses(
        (status = 200, description = "Orders of the customer, oldest first", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn find_by_customer(
    service: web::Data<OrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();

    let orders = web::block(move || service.find_by_customer(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/order/{order_id}
///
/// Absence is not an error: the body is `null` when no order has this id.
#[utoipa::path(
    get,
    path = "/orders/order/{order_id}",
    params(
        ("order_id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "The order, or null when it does not exist", body = OrderResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn find_by_order_id(
    service: web::Data<OrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.find_by_order_id(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order.map(OrderResponse::from)))
}

/// DELETE /orders/{order_id}
#[utoipa::path(
    delete,
    path = "/orders/{order_id}",
    params(
        ("order_id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 204, description = "Order and everything it owns deleted"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<OrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || service.delete_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// PUT /orders/return
///
/// Flags one item of an order as returned. Repeating the request overwrites
/// the reason.
#[utoipa::path(
    put,
    path = "/orders/return",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Return request submitted", body = MessageResponse),
        (status = 404, description = "Order not found, or item not found in order"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn submit_return(
    service: web::Data<OrderService>,
    body: web::Json<ReturnRequest>,
) -> Result<HttpResponse, AppError> {
    let request = ItemReturn::from(body.into_inner());

    web::block(move || service.submit_return(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Return request submitted".to_string(),
    }))
}
