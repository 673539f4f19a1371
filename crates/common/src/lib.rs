//! Cross-cutting helpers shared by the binary and the library crates.

pub mod utils;

pub use utils::logging::{init_logging, LogFormat};
