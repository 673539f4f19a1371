//! Domain service layer of the productivity backend.
//! - Validates caller input and identifiers before storage is touched.
//! - Maps storage failures into a small, typed taxonomy.
//! - Hydrates relations only when a read asks for them.

pub mod auth;
pub mod context;
pub mod domain;
pub mod errors;
pub mod ident;
pub mod include;
pub mod input;
pub mod repository;
pub mod services;
#[cfg(test)]
pub mod test_support;

pub use context::AppContext;
pub use errors::ServiceError;
