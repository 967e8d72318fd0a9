//! Delete builder: the equality / operator / `$or` subset of the filter
//! vocabulary, with no read options since deletes return no documents.

use bson::{Bson, Document};
use tracing::{debug, instrument};

use crate::document::{extend_array, set_field, set_operator};
use crate::executor::DocumentExecutor;
use crate::options::DeleteOptions;
use crate::value::IntoBson;

/// Immutable builder for a delete filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteBuilder {
    filter: Document,
    options: DeleteOptions,
}

impl DeleteBuilder {
    /// Create an empty delete builder
    pub fn new() -> Self {
        Self::default()
    }

    fn with_filter(&self, apply: impl FnOnce(&mut Document)) -> Self {
        let mut next = self.clone();
        apply(&mut next.filter);
        next
    }

    /// `{field: value}`
    pub fn filter(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_filter(|filter| set_field(filter, field, value.into_bson()))
    }

    /// `{field: {op: value}}`
    pub fn filter_operator(&self, field: &str, op: &str, value: impl IntoBson) -> Self {
        self.with_filter(|filter| set_operator(filter, field, op, value.into_bson()))
    }

    /// Appends to `$or`, creating it when absent
    pub fn or<I>(&self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.with_filter(|filter| extend_array(filter, "$or", conditions.into_iter().map(Bson::Document)))
    }

    /// The accumulated filter document
    pub fn document(&self) -> &Document {
        &self.filter
    }

    pub fn options(&self) -> &DeleteOptions {
        &self.options
    }

    pub fn into_document(self) -> Document {
        self.filter
    }

    #[instrument(skip_all, fields(operation = "delete_one"))]
    pub async fn delete_one<E: DocumentExecutor>(&self, executor: &E) -> Result<E::DeleteResult, E::Error> {
        debug!(filter = %self.filter, "Executing delete");
        executor.delete_one(self.filter.clone(), self.options.clone()).await
    }

    #[instrument(skip_all, fields(operation = "delete_many"))]
    pub async fn delete_many<E: DocumentExecutor>(&self, executor: &E) -> Result<E::DeleteResult, E::Error> {
        debug!(filter = %self.filter, "Executing delete");
        executor.delete_many(self.filter.clone(), self.options.clone()).await
    }
}

impl From<DeleteBuilder> for Document {
    fn from(builder: DeleteBuilder) -> Self {
        builder.filter
    }
}
