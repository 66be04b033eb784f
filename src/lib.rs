//! nub: smart context compression for AI agents.
//!
//! Compresses text, code, directory trees and mind maps into a fixed
//! `WIDTH × HEIGHT` character budget while keeping the structural landmarks a
//! reader orients by. Content parses into a uniform tree, every node gets an
//! importance score, budget flows top-down through a softmax allocator, and
//! each node renders at the densest level of detail its share affords. A
//! final enforcement pass makes the cap a hard guarantee.

pub mod allocate;
pub mod config;
pub mod dom;
pub mod enforce;
pub mod engine;
pub mod error;
pub mod formats;
pub mod input;
pub mod output;
pub mod score;
pub mod select;

pub use engine::{compress, CharBudget, Options};
pub use error::{Error, Result};

#[cfg(test)]
#[path = "tests/invariants.rs"]
mod invariants;
