// Domain entities
pub mod anomaly;
pub mod chunk;
pub mod event;
pub mod model;

pub use anomaly::*;
pub use chunk::*;
pub use event::*;
pub use model::*;
