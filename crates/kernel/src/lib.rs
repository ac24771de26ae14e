//! Settings, module trait and lifecycle registry shared by the Eddy & Ink crates.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
