//! 领域层

pub mod errors;
pub mod model;
pub mod repository;
pub mod service;
pub mod value_object;

pub use errors::{DomainError, DomainResult};
