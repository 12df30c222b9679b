//! # poq-core
//! Foundation types and traits for proof-of-quality scoring.

pub mod constants;
pub mod error;
pub mod network;
pub mod traits;
pub mod types;
