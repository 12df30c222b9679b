//! Scenario and invariant tests for proof-of-quality scoring.
//!
//! Integration tests live under `tests/`; builders shared between them are in
//! [`helpers`].

pub mod helpers;
