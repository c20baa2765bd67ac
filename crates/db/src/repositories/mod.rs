//! Query layer. Each repository is a unit struct with associated async fns
//! taking the pool explicitly.

pub mod dependency_repo;

pub use dependency_repo::{DependencyRepo, DependencyRepoError};
