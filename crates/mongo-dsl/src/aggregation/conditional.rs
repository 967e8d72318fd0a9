//! Conditional expression conveniences.

use bson::{doc, Bson, Document};

use super::builder::AggregationBuilder;
use crate::document::field_path;

impl AggregationBuilder {
    /// `$cond` into `conditionalValue`
    pub fn cond(&self, condition: Document, then: impl Into<Bson>, otherwise: impl Into<Bson>) -> Self {
        let (then, otherwise): (Bson, Bson) = (then.into(), otherwise.into());
        let expression = doc! {
            "if": condition,
            "then": then,
            "else": otherwise,
        };
        self.project_operator("conditionalValue", "$cond", Bson::Document(expression))
    }

    /// `{value: {$ifNull: ["$field", alternative]}}`
    pub fn if_null(&self, field: &str, alternative: impl Into<Bson>) -> Self {
        let args = vec![field_path(field), alternative.into()];
        self.project_operator("value", "$ifNull", Bson::Array(args))
    }

    /// `$switch` into `switchedValue`, branches kept in order
    pub fn switch<I, T>(&self, branches: I, default: impl Into<Bson>) -> Self
    where
        I: IntoIterator<Item = (Document, T)>,
        T: Into<Bson>,
    {
        let branches: Vec<Bson> = branches
            .into_iter()
            .map(|(case, then)| {
                let then: Bson = then.into();
                Bson::Document(doc! { "case": case, "then": then })
            })
            .collect();
        let default: Bson = default.into();
        let expression = doc! {
            "branches": branches,
            "default": default,
        };
        self.project_operator("switchedValue", "$switch", Bson::Document(expression))
    }
}
