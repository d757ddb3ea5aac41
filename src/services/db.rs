pub mod connect_db;
pub mod embedded_store;
pub mod flat_store;
pub mod memory_store;
pub mod store;
