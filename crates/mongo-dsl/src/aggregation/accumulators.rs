//! Single-accumulator `$group` shortcuts.
//!
//! Every shortcut except [`AggregationBuilder::add_to_set`] groups the whole
//! input on the string constant `"null"` and writes one accumulator under a
//! fixed output name.

use bson::{doc, Document};

use super::builder::AggregationBuilder;
use crate::document::field_path;

impl AggregationBuilder {
    fn group_all(&self, output: &str, op: &str, field: &str) -> Self {
        let mut accumulator = Document::new();
        accumulator.insert(op, field_path(field));
        self.push_stage("$group", doc! { "_id": "null", output: accumulator })
    }

    /// `{$group: {_id: "$field"}}`, one output document per distinct value
    pub fn add_to_set(&self, field: &str) -> Self {
        self.push_stage("$group", doc! { "_id": field_path(field) })
    }

    pub fn avg(&self, field: &str) -> Self {
        self.group_all("avg", "$avg", field)
    }

    /// Output field is `total`
    pub fn sum(&self, field: &str) -> Self {
        self.group_all("total", "$sum", field)
    }

    pub fn first(&self, field: &str) -> Self {
        self.group_all("first", "$first", field)
    }

    pub fn last(&self, field: &str) -> Self {
        self.group_all("last", "$last", field)
    }

    pub fn min(&self, field: &str) -> Self {
        self.group_all("min", "$min", field)
    }

    pub fn max(&self, field: &str) -> Self {
        self.group_all("max", "$max", field)
    }

    /// Output field is `items`
    pub fn push(&self, field: &str) -> Self {
        self.group_all("items", "$push", field)
    }
}
