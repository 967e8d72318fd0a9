//! Arithmetic and trigonometric expression conveniences.

use bson::{Bson, Document};

use super::builder::AggregationBuilder;
use crate::document::field_path;

impl AggregationBuilder {
    /// `"$field"` alone when `place` is `None`, `["$field", place]` otherwise
    fn rounding(&self, output: &str, op: &str, field: &str, place: Option<i32>) -> Self {
        let args = match place {
            None => field_path(field),
            Some(place) => Bson::Array(vec![field_path(field), Bson::Int32(place)]),
        };
        self.project_operator(output, op, args)
    }

    /// `$add` into `sum`
    pub fn add<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variadic("sum", "$add", fields)
    }

    /// `$multiply` into `product`
    pub fn multiply<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variadic("product", "$multiply", fields)
    }

    pub fn subtract(&self, first: &str, second: &str) -> Self {
        self.binary("difference", "$subtract", first, second)
    }

    pub fn divide(&self, first: &str, second: &str) -> Self {
        self.binary("quotient", "$divide", first, second)
    }

    /// `$mod` into `remainder`
    pub fn modulo(&self, first: &str, second: &str) -> Self {
        self.binary("remainder", "$mod", first, second)
    }

    pub fn abs(&self, field: &str) -> Self {
        self.unary("absolute", "$abs", field)
    }

    pub fn ceil(&self, field: &str) -> Self {
        self.unary("ceiling", "$ceil", field)
    }

    pub fn floor(&self, field: &str) -> Self {
        self.unary("floor", "$floor", field)
    }

    pub fn exp(&self, field: &str) -> Self {
        self.unary("exponential", "$exp", field)
    }

    /// Natural logarithm into `log`
    pub fn ln(&self, field: &str) -> Self {
        self.unary("log", "$ln", field)
    }

    /// Same stage as [`log10`](Self::log10)
    pub fn log(&self, field: &str) -> Self {
        self.log10(field)
    }

    pub fn log10(&self, field: &str) -> Self {
        self.unary("log10", "$log10", field)
    }

    pub fn pow(&self, field: &str, exponent: f64) -> Self {
        let args = vec![field_path(field), Bson::Double(exponent)];
        self.project_operator("power", "$pow", Bson::Array(args))
    }

    pub fn sqrt(&self, field: &str) -> Self {
        self.unary("squareRoot", "$sqrt", field)
    }

    pub fn round(&self, field: &str, place: Option<i32>) -> Self {
        self.rounding("rounded", "$round", field, place)
    }

    pub fn trunc(&self, field: &str, place: Option<i32>) -> Self {
        self.rounding("truncated", "$trunc", field, place)
    }

    /// `{random: {$rand: {}}}`
    pub fn rand(&self) -> Self {
        self.project_operator("random", "$rand", Bson::Document(Document::new()))
    }

    pub fn sin(&self, field: &str) -> Self {
        self.unary("sine", "$sin", field)
    }

    pub fn cos(&self, field: &str) -> Self {
        self.unary("cosine", "$cos", field)
    }

    pub fn tan(&self, field: &str) -> Self {
        self.unary("tangent", "$tan", field)
    }

    pub fn asin(&self, field: &str) -> Self {
        self.unary("arcsine", "$asin", field)
    }

    pub fn acos(&self, field: &str) -> Self {
        self.unary("arccosine", "$acos", field)
    }

    pub fn atan(&self, field: &str) -> Self {
        self.unary("arctangent", "$atan", field)
    }

    /// `{arctangent2: {$atan2: ["$y", "$x"]}}`
    pub fn atan2(&self, y_field: &str, x_field: &str) -> Self {
        self.binary("arctangent2", "$atan2", y_field, x_field)
    }

    pub fn asinh(&self, field: &str) -> Self {
        self.unary("hyperbolicAsin", "$asinh", field)
    }

    pub fn acosh(&self, field: &str) -> Self {
        self.unary("hyperbolicAcos", "$acosh", field)
    }

    pub fn atanh(&self, field: &str) -> Self {
        self.unary("hyperbolicAtan", "$atanh", field)
    }

    pub fn sinh(&self, field: &str) -> Self {
        self.unary("hyperbolicSin", "$sinh", field)
    }

    pub fn cosh(&self, field: &str) -> Self {
        self.unary("hyperbolicCos", "$cosh", field)
    }

    pub fn tanh(&self, field: &str) -> Self {
        self.unary("hyperbolicTan", "$tanh", field)
    }

    pub fn degrees_to_radians(&self, field: &str) -> Self {
        self.unary("radians", "$degreesToRadians", field)
    }

    pub fn radians_to_degrees(&self, field: &str) -> Self {
        self.unary("degrees", "$radiansToDegrees", field)
    }
}
