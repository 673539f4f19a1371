//! SeaORM entities for the lifeboard schema plus row-level write helpers.
//!
//! Helpers are generic over `ConnectionTrait` so they run unchanged inside a
//! transaction; they return `ModelError` with SQL failures already classified.

pub mod errors;
pub mod db;
pub mod user;
pub mod todo;
pub mod habit;
pub mod deadline;
pub mod exercise;
pub mod user_on_exercise;

#[cfg(test)]
mod tests;
