use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{ItemReturn, Order, OrderDraft};
use crate::domain::ports::OrderRepository;
use crate::domain::validation;

pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: impl OrderRepository) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub fn create_order(&self, draft: OrderDraft) -> Result<i32, DomainError> {
        let order = validation::validate(draft).inspect_err(|rejection| {
            log::warn!("Rejected order: {}", rejection);
        })?;
        let customer_id = order.customer_id;
        let id = self.repo.create(order)?;
        log::info!("Created order {} for customer {}", id, customer_id);
        Ok(id)
    }

    pub fn find_by_customer(&self, customer_id: i32) -> Result<Vec<Order>, DomainError> {
        self.repo.find_by_customer_id(customer_id)
    }

    pub fn find_by_order_id(&self, order_id: i32) -> Result<Option<Order>, DomainError> {
        self.repo.find_by_id(order_id)
    }

    pub fn delete_order(&self, order_id: i32) -> Result<(), DomainError> {
        if !self.repo.delete(order_id)? {
            return Err(DomainError::NotFound);
        }
        log::info!("Deleted order {}", order_id);
        Ok(())
    }

    pub fn submit_return(&self, request: ItemReturn) -> Result<(), DomainError> {
        let ItemReturn {
            order_id,
            item_id,
            reason,
        } = request;

        let found = self.repo.update(order_id, &mut |order: &mut Order| {
            if order.request_item_return(item_id, reason.clone()) {
                Ok(())
            } else {
                Err(DomainError::ItemNotFound)
            }
        })?;
        if !found {
            return Err(DomainError::NotFound);
        }
        log::info!("Return requested for item {} of order {}", item_id, order_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{AddressDraft, OrderItemDraft, PaymentDraft};
    use crate::domain::validation::Rejection;
    use crate::infrastructure::memory::InMemoryOrderRepository;

    fn draft(customer_id: i32, item_names: &[&str]) -> OrderDraft {
        OrderDraft {
            customer_id: Some(customer_id),
            total: 9.99,
            shipping_address: None,
            items: item_names
                .iter()
                .map(|name| OrderItemDraft {
                    name: Some(name.to_string()),
                    quantity: 2,
                    price: 9.99,
                })
                .collect(),
            payment: Some(PaymentDraft {
                method: Some("card".to_string()),
                number: Some("4111".to_string()),
                billing_address: Some(AddressDraft {
                    state: Some("IN".to_string()),
                    city: Some("Bloomington".to_string()),
                    postal_code: 47401,
                }),
            }),
        }
    }

    fn service() -> OrderService {
        OrderService::new(InMemoryOrderRepository::new())
    }

    #[test]
    fn create_then_find_by_id() {
        let service = service();

        let id = service.create_order(draft(1, &["Widget"])).expect("create failed");
        let order = service
            .find_by_order_id(id)
            .expect("find failed")
            .expect("order should exist");

        assert_eq!(order.id, id);
        assert_eq!(order.customer_id, 1);
        assert_eq!(order.items.len(), 1);
        assert!(!order.items[0].return_requested);
    }

    #[test]
    fn rejected_order_is_not_stored() {
        let service = service();
        let mut bad = draft(1, &["Widget"]);
        bad.payment = None;

        let err = service.create_order(bad).unwrap_err();

        assert!(matches!(err, DomainError::Rejected(Rejection::MissingPayment)));
        assert!(service.find_by_customer(1).expect("find failed").is_empty());
    }

    #[test]
    fn find_by_customer_returns_only_that_customer() {
        let service = service();
        let a = service.create_order(draft(1, &["A"])).expect("create failed");
        service.create_order(draft(2, &["B"])).expect("create failed");
        let c = service.create_order(draft(1, &["C"])).expect("create failed");

        let ids: Vec<i32> = service
            .find_by_customer(1)
            .expect("find failed")
            .into_iter()
            .map(|o| o.id)
            .collect();

        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn delete_missing_order_is_not_found() {
        let err = service().delete_order(42).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn delete_removes_order() {
        let service = service();
        let id = service.create_order(draft(1, &["Widget"])).expect("create failed");

        service.delete_order(id).expect("delete failed");

        assert!(service.find_by_order_id(id).expect("find failed").is_none());
    }

    #[test]
    fn submit_return_marks_matching_item() {
        let service = service();
        let id = service
            .create_order(draft(1, &["Widget", "Gadget"]))
            .expect("create failed");
        let order = service.find_by_order_id(id).unwrap().unwrap();
        let target = order.items[1].id;

        service
            .submit_return(ItemReturn {
                order_id: id,
                item_id: target,
                reason: Some("broken".to_string()),
            })
            .expect("return failed");

        let order = service.find_by_order_id(id).unwrap().unwrap();
        assert!(!order.items[0].return_requested);
        assert!(order.items[1].return_requested);
        assert_eq!(order.items[1].return_reason.as_deref(), Some("broken"));
    }

    #[test]
    fn submit_return_for_missing_order_or_item() {
        let service = service();
        let id = service.create_order(draft(1, &["Widget"])).expect("create failed");
        let before = service.find_by_order_id(id).unwrap();

        let err = service
            .submit_return(ItemReturn {
                order_id: id + 100,
                item_id: 1,
                reason: None,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));

        let err = service
            .submit_return(ItemReturn {
                order_id: id,
                item_id: -1,
                reason: Some("x".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::ItemNotFound));

        assert_eq!(service.find_by_order_id(id).unwrap(), before);
    }
}
