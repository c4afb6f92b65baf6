pub mod order_service;
