use chrono::{DateTime, Utc};

// ── Drafts: untrusted input as received from a client ───────────────────────

#[derive(Debug, Clone, Default)]
pub struct AddressDraft {
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentDraft {
    pub method: Option<String>,
    pub number: Option<String>,
    pub billing_address: Option<AddressDraft>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderItemDraft {
    pub name: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub customer_id: Option<i32>,
    pub total: f64,
    pub shipping_address: Option<AddressDraft>,
    pub items: Vec<OrderItemDraft>,
    pub payment: Option<PaymentDraft>,
}

// ── Validated aggregate, ready to be persisted ──────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub state: String,
    pub city: String,
    pub postal_code: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub method: String,
    pub number: Option<String>,
    pub billing_address: NewAddress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub name: String,
    pub quantity: i32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: i32,
    pub total: f64,
    pub shipping_address: Option<NewAddress>,
    pub items: Vec<NewOrderItem>,
    pub payment: NewPayment,
}

// ── Stored aggregate ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub id: i32,
    pub state: String,
    pub city: String,
    pub postal_code: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub method: String,
    pub number: Option<String>,
    pub billing_address: Address,
}

/// A line of an order. The owning order is implied by containment.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub return_requested: bool,
    pub return_reason: Option<String>,
}

/// An order together with the items, payment and addresses it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub total: f64,
    pub shipping_address: Option<Address>,
    pub items: Vec<OrderItem>,
    pub payment: Payment,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Marks the first item with `item_id` as returned. Returns `false` when
    /// no item matches.
    pub fn request_item_return(&mut self, item_id: i32, reason: Option<String>) -> bool {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                item.return_requested = true;
                item.return_reason = reason;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemReturn {
    pub order_id: i32,
    pub item_id: i32,
    pub reason: Option<String>,
}
