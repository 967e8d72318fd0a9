//! String expression conveniences.

use bson::{doc, Bson};

use super::builder::AggregationBuilder;
use crate::document::field_path;

impl AggregationBuilder {
    fn substring_with(&self, output: &str, op: &str, field: &str, start: i32, length: i32) -> Self {
        let args = vec![field_path(field), Bson::Int32(start), Bson::Int32(length)];
        self.project_operator(output, op, Bson::Array(args))
    }

    /// `$concat` of the given fields into `concatenatedString`
    pub fn concat<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variadic("concatenatedString", "$concat", fields)
    }

    pub fn substr(&self, field: &str, start: i32, length: i32) -> Self {
        self.substring_with("substring", "$substr", field, start, length)
    }

    pub fn substr_bytes(&self, field: &str, start: i32, length: i32) -> Self {
        self.substring_with("substringBytes", "$substrBytes", field, start, length)
    }

    pub fn substr_cp(&self, field: &str, start: i32, length: i32) -> Self {
        self.substring_with("substringCP", "$substrCP", field, start, length)
    }

    pub fn to_lower(&self, field: &str) -> Self {
        self.unary("lowercase", "$toLower", field)
    }

    pub fn to_upper(&self, field: &str) -> Self {
        self.unary("uppercase", "$toUpper", field)
    }

    pub fn trim(&self, field: &str) -> Self {
        self.unary("trimmed", "$trim", field)
    }

    pub fn ltrim(&self, field: &str) -> Self {
        self.unary("ltrimmed", "$ltrim", field)
    }

    pub fn rtrim(&self, field: &str) -> Self {
        self.unary("rtrimmed", "$rtrim", field)
    }

    /// `{splitArray: {$split: ["$field", delimiter]}}`; the delimiter is a literal
    pub fn split(&self, field: &str, delimiter: &str) -> Self {
        let args = vec![field_path(field), Bson::String(delimiter.to_string())];
        self.project_operator("splitArray", "$split", Bson::Array(args))
    }

    pub fn str_len_bytes(&self, field: &str) -> Self {
        self.unary("byteLength", "$strLenBytes", field)
    }

    pub fn str_len_cp(&self, field: &str) -> Self {
        self.unary("codePointLength", "$strLenCP", field)
    }

    pub fn strcasecmp(&self, first: &str, second: &str) -> Self {
        self.binary("comparison", "$strcasecmp", first, second)
    }

    /// `$regexMatch` into `matches`; `options` is omitted when `None`
    pub fn regex_match(&self, field: &str, regex: &str, options: Option<&str>) -> Self {
        let mut expression = doc! {
            "input": field_path(field),
            "regex": regex,
        };
        if let Some(options) = options {
            expression.insert("options", options);
        }
        self.project_operator("matches", "$regexMatch", Bson::Document(expression))
    }
}
