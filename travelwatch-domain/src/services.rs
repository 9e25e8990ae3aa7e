// Detection services: pure, synchronous, no I/O

pub mod geo;
pub mod grouper;
pub mod reconciler;
pub mod scanner;

pub use geo::*;
pub use grouper::*;
pub use reconciler::*;
pub use scanner::*;
