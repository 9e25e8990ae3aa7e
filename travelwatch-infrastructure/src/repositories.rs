pub mod clickhouse_repo;
pub mod memory_store;

pub use clickhouse_repo::*;
pub use memory_store::*;
