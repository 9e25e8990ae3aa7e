// Domain value objects
pub mod identifiers;
pub mod zero_elapsed_policy;

pub use identifiers::*;
pub use zero_elapsed_policy::*;
