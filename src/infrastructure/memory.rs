use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::order::{Address, NewAddress, NewOrder, Order, OrderItem, Payment};
use crate::domain::ports::{OrderMutation, OrderRepository};

#[derive(Debug)]
struct State {
    next_id: i32,
    orders: BTreeMap<i32, Order>,
}

impl State {
    /// Ids come from one sequence shared by every entity kind.
    fn next_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn address(&mut self, address: NewAddress) -> Address {
        Address {
            id: self.next_id(),
            state: address.state,
            city: address.city,
            postal_code: address.postal_code,
        }
    }
}

/// Process-local order store.
///
/// Intended for tests/dev. Contents are lost when the process exits.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    state: Mutex<State>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                orders: BTreeMap::new(),
            }),
        }
    }
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("order store lock poisoned".to_string()))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<i32, DomainError> {
        let mut state = self.lock()?;

        let shipping_address = order.shipping_address.map(|a| state.address(a));
        let billing_address = state.address(order.payment.billing_address);
        let payment = Payment {
            id: state.next_id(),
            method: order.payment.method,
            number: order.payment.number,
            billing_address,
        };
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: state.next_id(),
                name: item.name,
                quantity: item.quantity,
                price: item.price,
                return_requested: false,
                return_reason: None,
            })
            .collect();

        let id = state.next_id();
        state.orders.insert(
            id,
            Order {
                id,
                customer_id: order.customer_id,
                total: order.total,
                shipping_address,
                items,
                payment,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        Ok(self.lock()?.orders.get(&id).cloned())
    }

    fn find_by_customer_id(&self, customer_id: i32) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .lock()?
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn update(&self, id: i32, mutation: &mut OrderMutation<'_>) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let Some(stored) = state.orders.get_mut(&id) else {
            return Ok(false);
        };

        // Work on a copy so a failed mutation leaves the stored order as it was.
        let mut updated = stored.clone();
        mutation(&mut updated)?;
        *stored = updated;
        Ok(true)
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.lock()?.orders.remove(&id).is_some())
    }
}
