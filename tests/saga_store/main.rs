//! Integration tests for the in-memory saga store.

mod isolation;
mod properties;
mod typing;
