//! Model System - trait for database entities the relation layer reads from
//! and materializes into.

pub mod core_trait;

pub use core_trait::Model;
