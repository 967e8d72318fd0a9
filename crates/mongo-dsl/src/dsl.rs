//! Closure-style entry points.
//!
//! Each helper starts from an empty builder, lets the closure chain onto it and
//! returns the finished document (or pipeline).
//!
//! ```
//! use bson::doc;
//! use mongo_dsl::dsl;
//!
//! let filter = dsl::query(|q| q.equals("status", "active").greater_than("age", 18));
//! assert_eq!(filter, doc! { "status": "active", "age": { "$gt": 18_i64 } });
//! ```

use bson::Document;

use crate::aggregation::AggregationBuilder;
use crate::delete::DeleteBuilder;
use crate::filter::FilterBuilder;
use crate::update::UpdateBuilder;
use crate::Result;

pub fn query<F>(build: F) -> Document
where
    F: FnOnce(FilterBuilder) -> FilterBuilder,
{
    build(FilterBuilder::new()).into_document()
}

pub fn update<F>(build: F) -> Document
where
    F: FnOnce(UpdateBuilder) -> UpdateBuilder,
{
    build(UpdateBuilder::new()).into_document()
}

/// Like [`update`] for closures that may fail, e.g. ones calling
/// [`UpdateBuilder::set_object`]
pub fn try_update<F>(build: F) -> Result<Document>
where
    F: FnOnce(UpdateBuilder) -> Result<UpdateBuilder>,
{
    build(UpdateBuilder::new()).map(UpdateBuilder::into_document)
}

pub fn delete<F>(build: F) -> Document
where
    F: FnOnce(DeleteBuilder) -> DeleteBuilder,
{
    build(DeleteBuilder::new()).into_document()
}

pub fn aggregate<F>(build: F) -> Vec<Document>
where
    F: FnOnce(AggregationBuilder) -> AggregationBuilder,
{
    build(AggregationBuilder::new()).into_pipeline()
}
