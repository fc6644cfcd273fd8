//! Infrastructure layer.

pub mod directory;

pub use self::directory::{Directory, Memory};
