//! Relationships Module - resolving belongs-to, has-one and has-many
//! associations for a loaded parent record

mod base;

pub mod any;
pub mod belongs_to;
pub mod extensions;
pub mod has_many;
pub mod has_one;
pub mod traits;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod relation_tests;

pub use any::*;
pub use belongs_to::*;
pub use extensions::*;
pub use has_many::*;
pub use has_one::*;
pub use traits::*;
