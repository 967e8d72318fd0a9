//! Common utilities for mongo-dsl
//!
//! This crate provides the error type shared by the mongo-dsl crates.

pub mod error;

pub use error::{DslError, Result};
