//! Structural pipeline stages.

use bson::{doc, Bson, Document};

use super::builder::AggregationBuilder;
use crate::filter::FilterBuilder;
use crate::types::SortOrder;
use crate::value::{bson_array, IntoBson};

impl AggregationBuilder {
    /// `$match` with the filter accumulated by a [`FilterBuilder`]
    pub fn match_filter(&self, query: &FilterBuilder) -> Self {
        self.push_stage("$match", query.document().clone())
    }

    /// `$match` with a raw filter document
    pub fn match_document(&self, filter: Document) -> Self {
        self.push_stage("$match", filter)
    }

    /// `$group` with `_id` first, followed by the accumulator fields
    pub fn group(&self, id: impl IntoBson, fields: Document) -> Self {
        let mut group = doc! { "_id": id.into_bson() };
        group.extend(fields);
        self.push_stage("$group", group)
    }

    pub fn project(&self, fields: Document) -> Self {
        self.project_fields(fields)
    }

    pub fn sort(&self, field: &str, order: SortOrder) -> Self {
        self.push_stage("$sort", doc! { field: order.as_i32() })
    }

    /// `$sort` on several keys, in the given order
    pub fn sort_by<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, SortOrder)>,
        S: Into<String>,
    {
        let mut sort = Document::new();
        for (field, order) in fields {
            sort.insert(field, order.as_i32());
        }
        self.push_stage("$sort", sort)
    }

    pub fn limit(&self, count: i32) -> Self {
        self.push_stage("$limit", count)
    }

    pub fn skip(&self, count: i32) -> Self {
        self.push_stage("$skip", count)
    }

    pub fn lookup(&self, from: &str, local_field: &str, foreign_field: &str, alias: &str) -> Self {
        self.push_stage(
            "$lookup",
            doc! {
                "from": from,
                "localField": local_field,
                "foreignField": foreign_field,
                "as": alias,
            },
        )
    }

    /// `{$unwind: "$field"}`
    pub fn unwind(&self, field: &str) -> Self {
        self.push_stage("$unwind", format!("${}", field))
    }

    pub fn add_fields(&self, fields: Document) -> Self {
        self.push_stage("$addFields", fields)
    }

    /// `{$replaceRoot: {newRoot: "$field"}}`
    pub fn replace_root(&self, new_root: &str) -> Self {
        self.push_stage("$replaceRoot", doc! { "newRoot": format!("${}", new_root) })
    }

    /// `{$replaceWith: "$field"}`
    pub fn replace_with(&self, new_root: &str) -> Self {
        self.push_stage("$replaceWith", format!("${}", new_root))
    }

    pub fn redact(&self, expression: Document) -> Self {
        self.push_stage("$redact", expression)
    }

    pub fn sample(&self, size: i32) -> Self {
        self.push_stage("$sample", doc! { "size": size })
    }

    pub fn index_stats(&self) -> Self {
        self.push_stage("$indexStats", Document::new())
    }

    pub fn geo_near(&self, near: &[f64], distance_field: &str, spherical: bool) -> Self {
        let near: Vec<Bson> = near.iter().copied().map(Bson::Double).collect();
        self.push_stage(
            "$geoNear",
            doc! {
                "near": near,
                "distanceField": distance_field,
                "spherical": spherical,
            },
        )
    }

    /// `$facet` with named sub-pipelines, kept in the order given.
    ///
    /// Sub-pipelines may be plain stage lists or other [`AggregationBuilder`]s.
    pub fn facet<I, K, P>(&self, pipelines: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Vec<Document>>,
    {
        let mut facet = Document::new();
        for (name, pipeline) in pipelines {
            let stages: Vec<Bson> = pipeline.into().into_iter().map(Bson::Document).collect();
            facet.insert(name, stages);
        }
        self.push_stage("$facet", facet)
    }

    /// `$bucket`. `default` and `output` are omitted entirely when `None`.
    pub fn bucket<B>(
        &self,
        group_by: impl IntoBson,
        boundaries: B,
        default_bucket: Option<Bson>,
        output: Option<Document>,
    ) -> Self
    where
        B: IntoIterator,
        B::Item: IntoBson,
    {
        let mut bucket = doc! {
            "groupBy": group_by.into_bson(),
            "boundaries": bson_array(boundaries),
        };
        if let Some(default_bucket) = default_bucket {
            bucket.insert("default", default_bucket);
        }
        if let Some(output) = output {
            bucket.insert("output", output);
        }
        self.push_stage("$bucket", bucket)
    }

    /// `$bucketAuto`. `output` and `granularity` are omitted entirely when `None`.
    pub fn bucket_auto(
        &self,
        group_by: impl IntoBson,
        buckets: i32,
        output: Option<Document>,
        granularity: Option<&str>,
    ) -> Self {
        let mut bucket = doc! {
            "groupBy": group_by.into_bson(),
            "buckets": buckets,
        };
        if let Some(output) = output {
            bucket.insert("output", output);
        }
        if let Some(granularity) = granularity {
            bucket.insert("granularity", granularity);
        }
        self.push_stage("$bucketAuto", bucket)
    }

    /// `{$count: "field_name"}`
    pub fn count(&self, field_name: &str) -> Self {
        self.push_stage("$count", field_name)
    }

    pub fn sample_rate(&self, rate: f64) -> Self {
        self.push_stage("$sampleRate", rate)
    }
}
