//! Authentication leaves: password hashing and bearer-token issuing.
//!
//! Both are CPU-bound and run on the blocking pool so they never stall the
//! async workers serving unrelated calls.

pub mod hasher;
pub mod token;

pub use hasher::CredentialHasher;
pub use token::{Claims, TokenIssuer};
