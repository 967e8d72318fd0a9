//! Fluent builders for MongoDB documents
//!
//! This crate turns chained method calls into the filter, update, delete and
//! aggregation documents MongoDB understands, then hands them to a
//! [`DocumentExecutor`] for execution.
//!
//! # Features
//! - Immutable builders: every call returns a new builder, the receiver never changes
//! - Native Rust values convert to BSON through [`IntoBson`]
//! - Execution errors come back exactly as the executor produced them
//! - `mongodb::Collection<Document>` works as an executor out of the box
//!
//! # Example
//!
//! ```
//! use bson::doc;
//! use mongo_dsl::{FilterBuilder, SortOrder, UpdateBuilder};
//!
//! let adults = FilterBuilder::new()
//!     .greater_than_or_equal("age", 18)
//!     .sort("name", SortOrder::Ascending)
//!     .limit(20);
//! assert_eq!(adults.document(), &doc! { "age": { "$gte": 18_i64 } });
//!
//! let promote = UpdateBuilder::new().set("role", "member").increment("logins", 1);
//! assert_eq!(
//!     promote.document(),
//!     &doc! { "$set": { "role": "member" }, "$inc": { "logins": 1_i64 } }
//! );
//! ```

pub mod aggregation;
pub mod connection;
pub mod delete;
pub(crate) mod document;
pub mod dsl;
pub mod executor;
pub mod filter;
pub mod options;
pub mod types;
pub mod update;
pub mod value;

pub use aggregation::AggregationBuilder;
pub use connection::{Connection, ConnectionConfig, PoolConfig};
pub use delete::DeleteBuilder;
pub use executor::DocumentExecutor;
pub use filter::{FilterBuilder, TextSearchOptions};
pub use mongo_dsl_common::{DslError, Result};
pub use options::{DeleteOptions, FindOptions, UpdateOptions};
pub use types::{BsonType, SortOrder};
pub use update::UpdateBuilder;
pub use value::IntoBson;

pub use bson;
