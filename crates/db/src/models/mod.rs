//! Row types and their mapping onto domain values.

pub mod dependency;
