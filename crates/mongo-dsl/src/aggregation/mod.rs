//! Aggregation pipeline builder.
//!
//! Every stage method appends exactly one stage document; nothing is merged
//! or reordered, so `sort("a").sort("b")` yields two `$sort` stages.
//!
//! The expression conveniences (arithmetic, string, date, set, array and
//! conditional) each append a standalone `$project` stage with a fixed output
//! field name, e.g. `add` projects `sum` and `to_lower` projects `lowercase`.
//! Like any `$project` listing only computed fields, such a stage drops every
//! other field except `_id`.
//!
//! # Example
//!
//! ```
//! use bson::doc;
//! use mongo_dsl::{AggregationBuilder, FilterBuilder};
//!
//! let pipeline = AggregationBuilder::new()
//!     .match_filter(&FilterBuilder::new().equals("status", "active"))
//!     .limit(10);
//!
//! assert_eq!(
//!     pipeline.pipeline(),
//!     &[doc! { "$match": { "status": "active" } }, doc! { "$limit": 10 }]
//! );
//! ```

mod builder;
mod stages;
mod accumulators;
mod arrays;
mod strings;
mod dates;
mod arithmetic;
mod conditional;


pub use builder::AggregationBuilder;
