//! Bookstore application library
//!
//! Hosts the users and books modules and the wiring that serves them.

pub mod app;
pub mod modules;
pub mod utils;

pub use app::{build_registry, run};
