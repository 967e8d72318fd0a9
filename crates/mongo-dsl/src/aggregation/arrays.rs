//! Array and set expression conveniences.
//!
//! Each method appends one `$project` stage with a fixed output key. Two calls
//! produce two stages; they never merge.

use bson::{doc, Bson, Document};

use super::builder::AggregationBuilder;
use crate::document::{field_path, field_paths};

/// `"is" + field` with the first letter of each alphanumeric run upper-cased
/// and the rest lower-cased: `"tags"` -> `"isTags"`, `"home_page"` -> `"isHome_Page"`.
pub(crate) fn is_prefixed(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push_str("is");
    let mut at_word_start = true;
    for ch in field.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

impl AggregationBuilder {
    /// `$filter` over `$array`, written back under the array's name
    pub fn filter(&self, array: &str, alias: &str, cond: Document) -> Self {
        let expression = doc! {
            "input": field_path(array),
            "as": alias,
            "cond": cond,
        };
        self.project_operator(array, "$filter", Bson::Document(expression))
    }

    /// `$map` over `$array`, written back under the array's name
    pub fn map(&self, array: &str, alias: &str, expression: impl Into<Bson>) -> Self {
        let expression: Bson = expression.into();
        let map = doc! {
            "input": field_path(array),
            "as": alias,
            "in": expression,
        };
        self.project_operator(array, "$map", Bson::Document(map))
    }

    /// `$reduce` over `$array`, written back under the array's name
    pub fn reduce(&self, array: &str, initial_value: impl Into<Bson>, expression: impl Into<Bson>) -> Self {
        let (initial_value, expression): (Bson, Bson) = (initial_value.into(), expression.into());
        let reduce = doc! {
            "input": field_path(array),
            "initialValue": initial_value,
            "in": expression,
        };
        self.project_operator(array, "$reduce", Bson::Document(reduce))
    }

    /// `$zip` into `zipped`. `defaults` is omitted when `None`.
    pub fn zip<I, S>(&self, arrays: I, use_longest_length: bool, defaults: Option<Vec<Bson>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut zip = doc! {
            "inputs": field_paths(arrays),
            "useLongestLength": use_longest_length,
        };
        if let Some(defaults) = defaults {
            zip.insert("defaults", defaults);
        }
        self.project_operator("zipped", "$zip", Bson::Document(zip))
    }

    /// `{$range: [start, end]}` under `name`
    pub fn range(&self, name: &str, start: i32, end: i32) -> Self {
        self.range_step(name, start, end, 1)
    }

    /// `$range` with an explicit step; a step of 1 is left out of the array.
    pub fn range_step(&self, name: &str, start: i32, end: i32, step: i32) -> Self {
        let mut args = vec![Bson::Int32(start), Bson::Int32(end)];
        if step != 1 {
            args.push(Bson::Int32(step));
        }
        self.project_operator(name, "$range", Bson::Array(args))
    }

    pub fn reverse_array(&self, field: &str) -> Self {
        self.unary(field, "$reverseArray", field)
    }

    /// `$size` into `arraySize`
    pub fn size(&self, field: &str) -> Self {
        self.unary("arraySize", "$size", field)
    }

    /// `$isArray` into `is<Field>`
    pub fn is_array(&self, field: &str) -> Self {
        self.unary(&is_prefixed(field), "$isArray", field)
    }

    pub fn concat_arrays<I, S>(&self, arrays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variadic("concatenatedArray", "$concatArrays", arrays)
    }

    /// `$arrayElemAt` into `elementAt<index>`
    pub fn array_elem_at(&self, field: &str, index: i32) -> Self {
        let output = format!("elementAt{}", index);
        let args = vec![field_path(field), Bson::Int32(index)];
        self.project_operator(&output, "$arrayElemAt", Bson::Array(args))
    }

    /// `{field: {$slice: ["$field", count]}}`
    pub fn slice(&self, field: &str, count: i32) -> Self {
        let args = vec![field_path(field), Bson::Int32(count)];
        self.project_operator(field, "$slice", Bson::Array(args))
    }

    /// `{field: {$slice: ["$field", skip, limit]}}`
    pub fn slice_range(&self, field: &str, skip: i32, limit: i32) -> Self {
        let args = vec![field_path(field), Bson::Int32(skip), Bson::Int32(limit)];
        self.project_operator(field, "$slice", Bson::Array(args))
    }

    /// `$in` into `is<Field>InArray`
    pub fn in_array(&self, field: &str, array: &str) -> Self {
        let output = format!("{}InArray", is_prefixed(field));
        self.binary(&output, "$in", field, array)
    }

    pub fn set_equals<I, S>(&self, arrays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variadic("setsEqual", "$setEquals", arrays)
    }

    pub fn set_intersection<I, S>(&self, arrays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variadic("intersection", "$setIntersection", arrays)
    }

    /// `$setUnion` into `union`
    pub fn set_union<I, S>(&self, arrays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variadic("union", "$setUnion", arrays)
    }

    pub fn set_difference(&self, first: &str, second: &str) -> Self {
        self.binary("difference", "$setDifference", first, second)
    }

    pub fn set_is_subset(&self, first: &str, second: &str) -> Self {
        self.binary("isSubset", "$setIsSubset", first, second)
    }

    pub fn any_element_true(&self, array: &str) -> Self {
        self.unary("anyTrue", "$anyElementTrue", array)
    }

    pub fn all_elements_true(&self, array: &str) -> Self {
        self.unary("allTrue", "$allElementsTrue", array)
    }
}
