//! # Domain Module
//!
//! Core domain types for the Block Time Locator.

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
