use thiserror::Error;

use super::validation::Rejection;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Item not found in order")]
    ItemNotFound,
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
