//! Filter builder for MongoDB read operations
//!
//! Each field-level operator overwrites whatever condition the field held before
//! (last write wins). The logical operators `$and`, `$or` and `$nor` extend an
//! existing array instead. Sorting, paging and projection live in
//! [`FindOptions`] and never touch the filter document.

use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use tracing::{debug, instrument};

use crate::document::{extend_array, set_field, set_operator};
use crate::executor::DocumentExecutor;
use crate::options::FindOptions;
use crate::types::{BsonType, SortOrder};
use crate::value::{bson_array, IntoBson};

/// Options recognised by `$text` searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSearchOptions {
    /// Emitted as `$language` only when set
    pub language: Option<String>,
    pub case_sensitive: bool,
    pub diacritic_sensitive: bool,
}

/// Immutable builder for a filter document plus read options.
///
/// # Example
///
/// ```
/// use bson::doc;
/// use mongo_dsl::{FilterBuilder, SortOrder};
///
/// let query = FilterBuilder::new()
///     .equals("status", "active")
///     .greater_than("age", 18)
///     .sort("name", SortOrder::Ascending)
///     .limit(10);
///
/// assert_eq!(query.document(), &doc! { "status": "active", "age": { "$gt": 18_i64 } });
/// assert_eq!(query.options().limit, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBuilder {
    filter: Document,
    options: FindOptions,
}

impl FilterBuilder {
    /// Create an empty filter builder
    pub fn new() -> Self {
        Self::default()
    }

    fn with_filter(&self, apply: impl FnOnce(&mut Document)) -> Self {
        let mut next = self.clone();
        apply(&mut next.filter);
        next
    }

    fn with_options(&self, apply: impl FnOnce(&mut FindOptions)) -> Self {
        let mut next = self.clone();
        apply(&mut next.options);
        next
    }

    fn with_operator(&self, field: &str, op: &str, value: Bson) -> Self {
        self.with_filter(|filter| set_operator(filter, field, op, value))
    }

    // Field conditions

    /// `{field: value}`
    pub fn equals(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_filter(|filter| set_field(filter, field, value.into_bson()))
    }

    /// `{field: {$eq: value}}`
    pub fn equals_explicit(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator(field, "$eq", value.into_bson())
    }

    pub fn not_equals(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator(field, "$ne", value.into_bson())
    }

    pub fn greater_than(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator(field, "$gt", value.into_bson())
    }

    pub fn greater_than_or_equal(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator(field, "$gte", value.into_bson())
    }

    pub fn less_than(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator(field, "$lt", value.into_bson())
    }

    pub fn less_than_or_equal(&self, field: &str, value: impl IntoBson) -> Self {
        self.with_operator(field, "$lte", value.into_bson())
    }

    /// `{field: {$in: [...]}}`
    pub fn in_values<I>(&self, field: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoBson,
    {
        self.with_operator(field, "$in", bson_array(values))
    }

    /// `{field: {$nin: [...]}}`
    pub fn not_in<I>(&self, field: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoBson,
    {
        self.with_operator(field, "$nin", bson_array(values))
    }

    pub fn exists(&self, field: &str, exists: bool) -> Self {
        self.with_operator(field, "$exists", Bson::Boolean(exists))
    }

    /// `$type` by string alias
    pub fn of_type(&self, field: &str, bson_type: BsonType) -> Self {
        self.with_operator(field, "$type", Bson::String(bson_type.alias().to_string()))
    }

    /// `$type` by numeric BSON type code
    pub fn of_type_number(&self, field: &str, type_number: i32) -> Self {
        self.with_operator(field, "$type", Bson::Int32(type_number))
    }

    /// Regular expression match. `$options` is emitted only when non-empty.
    pub fn matches(&self, field: &str, pattern: &str, options: &str) -> Self {
        let condition = if options.is_empty() {
            doc! { "$regex": pattern }
        } else {
            doc! { "$regex": pattern, "$options": options }
        };
        self.with_filter(|filter| set_field(filter, field, Bson::Document(condition)))
    }

    // Array conditions

    /// Array contains `value` (plain equality against an array field)
    pub fn contains(&self, field: &str, value: impl IntoBson) -> Self {
        self.equals(field, value)
    }

    /// `{field: {$all: [...]}}`
    pub fn contains_all<I>(&self, field: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoBson,
    {
        self.with_operator(field, "$all", bson_array(values))
    }

    /// Same shape as [`contains_all`](Self::contains_all)
    pub fn all<I>(&self, field: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoBson,
    {
        self.contains_all(field, values)
    }

    pub fn size(&self, field: &str, count: i32) -> Self {
        self.with_operator(field, "$size", Bson::Int32(count))
    }

    pub fn elem_match(&self, field: &str, condition: Document) -> Self {
        self.with_operator(field, "$elemMatch", Bson::Document(condition))
    }

    /// `{field: {$mod: [divisor, remainder]}}`
    pub fn modulo(&self, field: &str, divisor: i64, remainder: i64) -> Self {
        self.with_operator(
            field,
            "$mod",
            Bson::Array(vec![Bson::Int64(divisor), Bson::Int64(remainder)]),
        )
    }

    // Dot-notation paths

    pub fn nested_equals(&self, path: &str, value: impl IntoBson) -> Self {
        self.equals(path, value)
    }

    /// `{path: {op: value}}` with a caller-chosen operator
    pub fn nested_operator(&self, path: &str, op: &str, value: impl IntoBson) -> Self {
        self.with_operator(path, op, value.into_bson())
    }

    // Null and missing

    /// `true` matches null or missing, `false` emits `{$ne: null}`
    pub fn is_null(&self, field: &str, is_null: bool) -> Self {
        if is_null {
            self.with_filter(|filter| set_field(filter, field, Bson::Null))
        } else {
            self.with_operator(field, "$ne", Bson::Null)
        }
    }

    /// `true` emits `{$exists: false}`, `false` emits `{$exists: true}`
    pub fn missing(&self, field: &str, missing: bool) -> Self {
        self.exists(field, !missing)
    }

    // Logical composition

    /// Appends to `$and`, creating it when absent
    pub fn and<I>(&self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.with_filter(|filter| extend_array(filter, "$and", conditions.into_iter().map(Bson::Document)))
    }

    /// Appends to `$or`, creating it when absent
    pub fn or<I>(&self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.with_filter(|filter| extend_array(filter, "$or", conditions.into_iter().map(Bson::Document)))
    }

    /// Appends to `$nor`, creating it when absent
    pub fn nor<I>(&self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.with_filter(|filter| extend_array(filter, "$nor", conditions.into_iter().map(Bson::Document)))
    }

    /// Overwrites `$not`
    pub fn not(&self, condition: Document) -> Self {
        self.with_filter(|filter| set_field(filter, "$not", Bson::Document(condition)))
    }

    /// Overwrites the top-level `$expr`
    pub fn expr(&self, expression: Document) -> Self {
        self.with_filter(|filter| set_field(filter, "$expr", Bson::Document(expression)))
    }

    // Text and geospatial

    pub fn text_search(&self, search: &str, options: TextSearchOptions) -> Self {
        let mut text = doc! { "$search": search };
        if let Some(language) = options.language {
            text.insert("$language", language);
        }
        text.insert("$caseSensitive", options.case_sensitive);
        text.insert("$diacriticSensitive", options.diacritic_sensitive);
        self.with_filter(|filter| set_field(filter, "$text", Bson::Document(text)))
    }

    /// `$near` around a GeoJSON point
    pub fn near(&self, field: &str, coordinates: &[f64], max_distance: Option<f64>) -> Self {
        self.with_operator(field, "$near", Bson::Document(geo_point_query(coordinates, max_distance)))
    }

    /// `$nearSphere` around a GeoJSON point
    pub fn near_sphere(&self, field: &str, coordinates: &[f64], max_distance: Option<f64>) -> Self {
        self.with_operator(
            field,
            "$nearSphere",
            Bson::Document(geo_point_query(coordinates, max_distance)),
        )
    }

    // Read options

    /// Replace the sort with a single key
    pub fn sort(&self, field: &str, order: SortOrder) -> Self {
        self.with_options(|options| options.sort = Some(doc! { field: order.as_i32() }))
    }

    /// Replace the sort with several keys, in the given order
    pub fn sort_by<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, SortOrder)>,
        S: Into<String>,
    {
        let mut sort = Document::new();
        for (field, order) in fields {
            sort.insert(field, order.as_i32());
        }
        self.with_options(|options| options.sort = Some(sort))
    }

    pub fn limit(&self, count: i64) -> Self {
        self.with_options(|options| options.limit = Some(count))
    }

    pub fn skip(&self, count: u64) -> Self {
        self.with_options(|options| options.skip = Some(count))
    }

    /// Inclusion projection; replaces any previous projection
    pub fn select<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let projection = projection_of(fields, 1);
        self.with_options(|options| options.projection = Some(projection))
    }

    /// Exclusion projection; replaces any previous projection
    pub fn exclude<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let projection = projection_of(fields, 0);
        self.with_options(|options| options.projection = Some(projection))
    }

    /// Adds `{field: {$slice: count}}` to the projection
    pub fn slice(&self, field: &str, count: i32) -> Self {
        self.with_slice(field, Bson::Int32(count))
    }

    /// Adds `{field: {$slice: [skip, limit]}}` to the projection
    pub fn slice_range(&self, field: &str, skip: i32, limit: i32) -> Self {
        self.with_slice(field, Bson::Array(vec![Bson::Int32(skip), Bson::Int32(limit)]))
    }

    fn with_slice(&self, field: &str, slice: Bson) -> Self {
        self.with_options(|options| {
            options
                .projection
                .get_or_insert_with(Document::new)
                .insert(field, doc! { "$slice": slice });
        })
    }

    // Accessors

    /// The accumulated filter document
    pub fn document(&self) -> &Document {
        &self.filter
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    pub fn into_document(self) -> Document {
        self.filter
    }

    // Execution

    /// Run the filter and return the executor's cursor
    #[instrument(skip_all, fields(operation = "find"))]
    pub async fn find<E: DocumentExecutor>(&self, executor: &E) -> Result<E::Cursor, E::Error> {
        debug!(filter = %self.filter, "Executing query");
        executor.find(self.filter.clone(), self.options.clone()).await
    }

    /// Return the first matching document. Read options are not applied.
    #[instrument(skip_all, fields(operation = "find_one"))]
    pub async fn find_one<E: DocumentExecutor>(&self, executor: &E) -> Result<Option<Document>, E::Error> {
        debug!(filter = %self.filter, "Executing query");
        executor.find_one(self.filter.clone()).await
    }

    #[instrument(skip_all, fields(operation = "count"))]
    pub async fn count<E: DocumentExecutor>(&self, executor: &E) -> Result<u64, E::Error> {
        debug!(filter = %self.filter, "Executing count");
        executor.count_documents(self.filter.clone()).await
    }

    /// Run the filter and collect every result document
    pub async fn to_list<E: DocumentExecutor>(&self, executor: &E) -> Result<Vec<Document>, E::Error> {
        let cursor = self.find(executor).await?;
        cursor.try_collect().await
    }
}

impl From<FilterBuilder> for Document {
    fn from(builder: FilterBuilder) -> Self {
        builder.filter
    }
}

fn geo_point_query(coordinates: &[f64], max_distance: Option<f64>) -> Document {
    let coordinates: Vec<Bson> = coordinates.iter().copied().map(Bson::Double).collect();
    let mut query = doc! {
        "$geometry": { "type": "Point", "coordinates": coordinates }
    };
    if let Some(distance) = max_distance {
        query.insert("$maxDistance", distance);
    }
    query
}

fn projection_of<I, S>(fields: I, flag: i32) -> Document
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut projection = Document::new();
    for field in fields {
        projection.insert(field, flag);
    }
    projection
}
