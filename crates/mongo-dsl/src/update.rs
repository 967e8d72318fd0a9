//! Update builder for MongoDB write operations
//!
//! Field-level mutators merge into their operator sub-document, so
//! `set("a", 1).set("b", 2)` yields a single `$set` with two fields. The
//! whole-document `set_document` / `set_object` forms replace `$set` outright.

use bson::{doc, Bson, Document};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::document::{merge_operator, set_field};
use crate::executor::DocumentExecutor;
use crate::filter::FilterBuilder;
use crate::options::UpdateOptions;
use crate::value::{bson_array, IntoBson};
use crate::{DslError, Result};

/// Immutable builder for an update-operator document plus update options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    updates: Document,
    options: UpdateOptions,
}

impl UpdateBuilder {
    /// Create an empty update builder
    pub fn new() -> Self {
        Self::default()
    }

    fn with_operator(&self, op: &str, field: impl Into<String>, value: Bson) -> Self {
        let mut next = self.clone();
        merge_operator(&mut next.updates, op, field, value);
        next
    }

    // $set

    /// Replace `$set` with the given document
    pub fn set_document(&self, fields: Document) -> Self {
        let mut next = self.clone();
        set_field(&mut next.updates, "$set", Bson::Document(fields));
        next
    }

    /// Replace `$set` with the serialized form of `value`
    ///
    /// # Errors
    ///
    /// Returns [`DslError::Serialization`] if `value` does not serialize to a
    /// BSON document.
    pub fn set_object<T: Serialize>(&self, value: &T) -> Result<Self> {
        let fields = bson::to_document(value)
            .map_err(|e| DslError::Serialization(format!("BSON serialization error: {}", e)))?;
        Ok(self.set_document(fields))
    }

    /// `$set: {field: value}`, merged with earlier `$set` fields
    pub fn set(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator("$set", field, value.into_bson())
    }

    /// `$set: {"field.$": value}`
    pub fn set_at_position(&self, field: &str, value: impl IntoBson) -> Self {
        self.set(&format!("{}.$", field), value)
    }

    /// `$set: {"field.$[]": value}`
    pub fn set_at_all_positions(&self, field: &str, value: impl IntoBson) -> Self {
        self.set(&format!("{}.$[]", field), value)
    }

    /// `$set: {"field.$[identifier]": value}` and appends `condition` to the
    /// array filters
    pub fn set_at_filtered_position(
        &self,
        field: &str,
        value: impl IntoBson,
        identifier: &str,
        condition: Document,
    ) -> Self {
        let mut next = self.set(&format!("{}.$[{}]", field, identifier), value);
        next.options.array_filters.push(condition);
        next
    }

    pub fn set_on_insert(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator("$setOnInsert", field, value.into_bson())
    }

    pub fn unset(&self, field: &str) -> Self {
        self.with_operator("$unset", field, Bson::Int32(1))
    }

    pub fn rename(&self, field: &str, new_name: &str) -> Self {
        self.with_operator("$rename", field, Bson::String(new_name.to_string()))
    }

    pub fn current_date(&self, field: &str) -> Self {
        self.with_operator("$currentDate", field, Bson::Boolean(true))
    }

    // Arithmetic

    pub fn increment(&self, field: &str, by: impl IntoBson) -> Self {
        self.with_operator("$inc", field, by.into_bson())
    }

    pub fn multiply(&self, field: &str, by: f64) -> Self {
        self.with_operator("$mul", field, Bson::Double(by))
    }

    // Arrays

    /// `$push: {field: value}` without an `$each` wrapper
    pub fn push(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator("$push", field, value.into_bson())
    }

    /// `$push` with modifiers such as `$slice` or `$sort`.
    ///
    /// With no modifiers this is identical to [`push`](Self::push); otherwise
    /// the value is wrapped as `{$each: [value], ...modifiers}`.
    pub fn push_with_options<I, K>(&self, field: &str, value: impl IntoBson, modifiers: I) -> Self
    where
        I: IntoIterator<Item = (K, Bson)>,
        K: Into<String>,
    {
        let mut modifiers = modifiers.into_iter().peekable();
        if modifiers.peek().is_none() {
            return self.push(field, value);
        }
        let each = each_with_modifiers(Bson::Array(vec![value.into_bson()]), modifiers);
        self.with_operator("$push", field, Bson::Document(each))
    }

    /// `$push: {field: {$each: [...], ...modifiers}}`; always wrapped
    pub fn push_each<I, K, V>(&self, field: &str, values: V, modifiers: I) -> Self
    where
        V: IntoIterator,
        V::Item: IntoBson,
        I: IntoIterator<Item = (K, Bson)>,
        K: Into<String>,
    {
        let each = each_with_modifiers(bson_array(values), modifiers);
        self.with_operator("$push", field, Bson::Document(each))
    }

    /// `$addToSet: {field: value}`; never wrapped
    pub fn add_to_set(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator("$addToSet", field, value.into_bson())
    }

    /// `$addToSet: {field: {$each: [...]}}`; always wrapped
    pub fn add_each_to_set<V>(&self, field: &str, values: V) -> Self
    where
        V: IntoIterator,
        V::Item: IntoBson,
    {
        self.with_operator("$addToSet", field, Bson::Document(doc! { "$each": bson_array(values) }))
    }

    /// Removes the first (`-1`) or last (`1`) element
    pub fn pop(&self, field: &str, first: bool) -> Self {
        self.with_operator("$pop", field, Bson::Int32(if first { -1 } else { 1 }))
    }

    pub fn pull(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator("$pull", field, value.into_bson())
    }

    pub fn pull_all<V>(&self, field: &str, values: V) -> Self
    where
        V: IntoIterator,
        V::Item: IntoBson,
    {
        self.with_operator("$pullAll", field, bson_array(values))
    }

    // Options

    pub fn upsert(&self, upsert: bool) -> Self {
        let mut next = self.clone();
        next.options.upsert = upsert;
        next
    }

    // Accessors

    /// The accumulated update document
    pub fn document(&self) -> &Document {
        &self.updates
    }

    pub fn options(&self) -> &UpdateOptions {
        &self.options
    }

    pub fn into_document(self) -> Document {
        self.updates
    }

    // Execution

    /// Update the first document matching `filter`
    #[instrument(skip_all, fields(operation = "update_one"))]
    pub async fn update_one<E: DocumentExecutor>(
        &self,
        executor: &E,
        filter: &FilterBuilder,
    ) -> std::result::Result<E::UpdateResult, E::Error> {
        debug!(filter = %filter.document(), update = %self.updates, upsert = self.options.upsert, "Executing update");
        executor
            .update_one(filter.document().clone(), self.updates.clone(), self.options.clone())
            .await
    }

    /// Update every document matching `filter`
    #[instrument(skip_all, fields(operation = "update_many"))]
    pub async fn update_many<E: DocumentExecutor>(
        &self,
        executor: &E,
        filter: &FilterBuilder,
    ) -> std::result::Result<E::UpdateResult, E::Error> {
        debug!(filter = %filter.document(), update = %self.updates, upsert = self.options.upsert, "Executing update");
        executor
            .update_many(filter.document().clone(), self.updates.clone(), self.options.clone())
            .await
    }
}

impl From<UpdateBuilder> for Document {
    fn from(builder: UpdateBuilder) -> Self {
        builder.updates
    }
}

fn each_with_modifiers<I, K>(each: Bson, modifiers: I) -> Document
where
    I: IntoIterator<Item = (K, Bson)>,
    K: Into<String>,
{
    let mut wrapped = doc! { "$each": each };
    for (modifier, value) in modifiers {
        wrapped.insert(modifier, value);
    }
    wrapped
}
