//! Domain types for plugin version dependencies.
//!
//! Pure logic only: no database or HTTP concerns live here.

pub mod dependency;
pub mod error;
pub mod linkout;
pub mod named;
pub mod namespace;
pub mod platform;
pub mod types;
