//! Domain layer for the Draw Orchestrator.

pub mod errors;
pub mod lifecycle;
pub mod value_objects;

pub use errors::*;
pub use lifecycle::*;
pub use value_objects::*;
