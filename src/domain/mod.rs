pub mod market;
pub mod portfolio;
pub mod trade;

pub use market::*;
pub use portfolio::*;
pub use trade::*;
