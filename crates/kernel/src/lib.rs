//! Core building blocks shared by every bookstore module: layered settings,
//! the resource error taxonomy, and the module lifecycle registry.

pub mod error;
pub mod module;
pub mod registry;
pub mod settings;

pub use error::{ErrorStatus, Operation, ResourceError};
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
