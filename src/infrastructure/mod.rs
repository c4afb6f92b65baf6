pub mod memory;
pub mod models;
pub mod order_repo;

pub use memory::InMemoryOrderRepository;
pub use order_repo::DieselOrderRepository;
