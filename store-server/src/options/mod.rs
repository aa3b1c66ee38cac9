//! Options Engine
//!
//! The inventory core: cascade resolution, variant matrix repair, stock
//! synchronization, and the template store feeding all three.

pub mod cascade;
pub mod matrix;
pub mod stock;
pub mod templates;

pub use cascade::CascadeResolver;
pub use matrix::MatrixManager;
pub use stock::StockSynchronizer;
pub use templates::TemplateService;
