//! Core domain types
//!
//! Shared error hierarchy and result alias used by every other module.

pub mod errors;
pub mod result;

pub use errors::ShroudError;
pub use result::Result;
