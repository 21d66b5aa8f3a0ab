//! Domain types for BarLab

pub mod bar;
pub mod fill;
pub mod order;
pub mod portfolio;
pub mod valuation;

pub use bar::Bar;
pub use fill::Fill;
pub use order::Order;
pub use portfolio::Portfolio;
pub use valuation::Valuation;
