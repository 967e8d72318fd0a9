//! Date part extraction and formatting.

use bson::{doc, Bson, Document};

use super::builder::AggregationBuilder;
use crate::document::field_path;

/// `{output: {op: "$field"}}` entries sharing one source field
fn date_parts(field: &str, parts: &[(&str, &str)]) -> Document {
    let mut projection = Document::new();
    for &(output, op) in parts {
        let mut part = Document::new();
        part.insert(op, field_path(field));
        projection.insert(output, part);
    }
    projection
}

impl AggregationBuilder {
    /// `$dateToString` into `formattedDate`; `format` is omitted when `None`
    pub fn date_to_string(&self, field: &str, format: Option<&str>) -> Self {
        let mut expression = doc! { "date": field_path(field) };
        if let Some(format) = format {
            expression.insert("format", format);
        }
        self.project_operator("formattedDate", "$dateToString", Bson::Document(expression))
    }

    pub fn year(&self, field: &str) -> Self {
        self.unary("year", "$year", field)
    }

    pub fn month(&self, field: &str) -> Self {
        self.unary("month", "$month", field)
    }

    /// `$dayOfMonth` into `day`
    pub fn day_of_month(&self, field: &str) -> Self {
        self.unary("day", "$dayOfMonth", field)
    }

    pub fn day_of_year(&self, field: &str) -> Self {
        self.unary("dayOfYear", "$dayOfYear", field)
    }

    pub fn day_of_week(&self, field: &str) -> Self {
        self.unary("dayOfWeek", "$dayOfWeek", field)
    }

    pub fn hour(&self, field: &str) -> Self {
        self.unary("hour", "$hour", field)
    }

    pub fn minute(&self, field: &str) -> Self {
        self.unary("minute", "$minute", field)
    }

    pub fn second(&self, field: &str) -> Self {
        self.unary("second", "$second", field)
    }

    pub fn millisecond(&self, field: &str) -> Self {
        self.unary("millisecond", "$millisecond", field)
    }

    pub fn week(&self, field: &str) -> Self {
        self.unary("week", "$week", field)
    }

    /// One `$project` with `year`, `month` and `day`
    pub fn year_month_day(&self, field: &str) -> Self {
        self.project_fields(date_parts(
            field,
            &[("year", "$year"), ("month", "$month"), ("day", "$dayOfMonth")],
        ))
    }

    /// One `$project` with `hour`, `minute` and `second`
    pub fn hour_minute_second(&self, field: &str) -> Self {
        self.project_fields(date_parts(
            field,
            &[("hour", "$hour"), ("minute", "$minute"), ("second", "$second")],
        ))
    }
}
