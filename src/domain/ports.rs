use super::errors::DomainError;
use super::order::{NewOrder, Order};

/// Callback applied to a stored order inside [`OrderRepository::update`].
pub type OrderMutation<'a> = dyn FnMut(&mut Order) -> Result<(), DomainError> + Send + 'a;

/// Persistence of whole order aggregates: every write covers the order with
/// its items, payment and addresses.
pub trait OrderRepository: Send + Sync + 'static {
    /// Stores the aggregate and returns the id assigned to the order.
    fn create(&self, order: NewOrder) -> Result<i32, DomainError>;

    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError>;

    /// Orders of `customer_id`, ascending by order id.
    fn find_by_customer_id(&self, customer_id: i32) -> Result<Vec<Order>, DomainError>;

    /// Loads the order, applies `mutation` and writes the result back as one
    /// atomic step. Nothing is written if `mutation` fails.
    ///
    /// Returns `false` when no order has this id.
    fn update(&self, id: i32, mutation: &mut OrderMutation<'_>) -> Result<bool, DomainError>;

    /// Deletes the aggregate. Returns `false` when no order has this id.
    fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
