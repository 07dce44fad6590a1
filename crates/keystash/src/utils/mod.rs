//! Small helpers shared across the cache modules.

pub mod serde;

pub use self::serde::duration_millis;
