//! [`Directory`] of the known [`User`]s.
//!
//! [`User`]: crate::domain::User

pub mod memory;

pub use self::memory::Memory;

/// Lookup of the known [`User`]s.
///
/// [`User`]: crate::domain::User
pub use common::Handler as Directory;
