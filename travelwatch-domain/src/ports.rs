// Repository Port Traits (Interfaces)
// Define what the scan core needs from storage

pub mod repositories;

pub use repositories::*;
