//! Structural checks applied to an order before it is first stored.
//!
//! Checks run in a fixed order and stop at the first failure, so a payload
//! with several problems always reports the earliest one.

use thiserror::Error;

use super::order::{
    AddressDraft, NewAddress, NewOrder, NewOrderItem, NewPayment, OrderDraft, OrderItemDraft,
};

/// Reason an order draft was refused. `Display` is the client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Missing customerId")]
    MissingCustomerId,
    #[error("At least one item is required")]
    NoItems,
    #[error("All items must have a name, quantity, and price")]
    InvalidItem,
    #[error("Payment method and billing address are required")]
    MissingPayment,
    #[error("Billing address must have a state, city, and postal code")]
    InvalidBillingAddress,
    #[error("Shipping address must have a state, city, and postal code")]
    InvalidShippingAddress,
}

/// Validate `draft` and turn it into an order that can be persisted.
pub fn validate(draft: OrderDraft) -> Result<NewOrder, Rejection> {
    let customer_id = draft.customer_id.ok_or(Rejection::MissingCustomerId)?;

    if draft.items.is_empty() {
        return Err(Rejection::NoItems);
    }
    let items = draft
        .items
        .into_iter()
        .map(validate_item)
        .collect::<Option<Vec<_>>>()
        .ok_or(Rejection::InvalidItem)?;

    let payment = draft.payment.ok_or(Rejection::MissingPayment)?;
    let method = present(payment.method).ok_or(Rejection::MissingPayment)?;
    let billing_address = payment.billing_address.ok_or(Rejection::MissingPayment)?;
    let billing_address = validate_address(billing_address).ok_or(Rejection::InvalidBillingAddress)?;

    let shipping_address = draft
        .shipping_address
        .map(|address| validate_address(address).ok_or(Rejection::InvalidShippingAddress))
        .transpose()?;

    Ok(NewOrder {
        customer_id,
        total: draft.total,
        shipping_address,
        items,
        payment: NewPayment {
            method,
            number: payment.number,
            billing_address,
        },
    })
}

fn validate_item(item: OrderItemDraft) -> Option<NewOrderItem> {
    if item.quantity == 0 || item.price == 0.0 {
        return None;
    }
    Some(NewOrderItem {
        name: present(item.name)?,
        quantity: item.quantity,
        price: item.price,
    })
}

fn validate_address(address: AddressDraft) -> Option<NewAddress> {
    if address.postal_code == 0 {
        return None;
    }
    Some(NewAddress {
        state: present(address.state)?,
        city: present(address.city)?,
        postal_code: address.postal_code,
    })
}

/// Blank strings count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
