//! Store server: inventory variant & options cascade engine
//!
//! Resolves which gender/size/color option sets apply to a SKU (SKU →
//! category → system cascade), expands them into a concrete variant matrix,
//! and keeps the parent item's aggregate stock consistent with its variants.

pub mod api;
pub mod core;
pub mod db;
pub mod options;

pub use core::{Config, ServerState};
