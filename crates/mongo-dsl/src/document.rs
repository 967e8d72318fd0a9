//! Document accumulation primitives shared by all builders.
//!
//! The builders never mutate a document that somebody else can observe: each
//! mutator clones the builder state and then applies exactly one of the
//! operations below to the clone.

use bson::{Bson, Document};

/// Overwrites `doc[key]`, keeping the key's original position if present.
pub(crate) fn set_field(doc: &mut Document, key: impl Into<String>, value: Bson) {
    doc.insert(key, value);
}

/// Overwrites `doc[key]` with a single-operator document `{op: value}`.
pub(crate) fn set_operator(doc: &mut Document, key: impl Into<String>, op: &str, value: Bson) {
    let mut inner = Document::new();
    inner.insert(op, value);
    doc.insert(key, Bson::Document(inner));
}

/// Appends `items` to the array stored under `key`, creating it when absent.
///
/// A non-array value under `key` is replaced.
pub(crate) fn extend_array<I>(doc: &mut Document, key: &str, items: I)
where
    I: IntoIterator<Item = Bson>,
{
    match doc.get_mut(key) {
        Some(Bson::Array(existing)) => existing.extend(items),
        _ => {
            doc.insert(key, Bson::Array(items.into_iter().collect()));
        }
    }
}

/// Sets `doc[op][field] = value`, creating the operator sub-document when
/// absent. Repeated calls with the same `op` accumulate fields.
pub(crate) fn merge_operator(doc: &mut Document, op: &str, field: impl Into<String>, value: Bson) {
    match doc.get_mut(op) {
        Some(Bson::Document(inner)) => {
            inner.insert(field, value);
        }
        _ => {
            let mut inner = Document::new();
            inner.insert(field, value);
            doc.insert(op, Bson::Document(inner));
        }
    }
}

/// `"$<field>"` field-path expression.
pub(crate) fn field_path(field: &str) -> Bson {
    Bson::String(format!("${}", field))
}

/// Array of field-path expressions.
pub(crate) fn field_paths<I, S>(fields: I) -> Bson
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Bson::Array(fields.into_iter().map(|f| field_path(f.as_ref())).collect())
}
