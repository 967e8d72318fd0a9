//! AggregationBuilder struct and core implementation.

use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use tracing::{debug, instrument};

use crate::document::{field_path, field_paths};
use crate::executor::DocumentExecutor;

/// Immutable builder for an ordered sequence of pipeline stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationBuilder {
    pub(super) stages: Vec<Document>,
}

impl AggregationBuilder {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `{name: body}` to a copy of the pipeline.
    pub(super) fn push_stage(&self, name: &str, body: impl Into<Bson>) -> Self {
        let mut next = self.clone();
        let mut stage = Document::new();
        stage.insert(name, body.into());
        next.stages.push(stage);
        next
    }

    /// Appends `{$project: projection}`.
    pub(super) fn project_fields(&self, projection: Document) -> Self {
        self.push_stage("$project", projection)
    }

    /// Appends `{$project: {output: {op: args}}}`.
    pub(super) fn project_operator(&self, output: &str, op: &str, args: Bson) -> Self {
        let mut expression = Document::new();
        expression.insert(op, args);
        self.project_fields(doc! { output: expression })
    }

    /// `{$project: {output: {op: "$field"}}}`
    pub(super) fn unary(&self, output: &str, op: &str, field: &str) -> Self {
        self.project_operator(output, op, field_path(field))
    }

    /// `{$project: {output: {op: ["$first", "$second"]}}}`
    pub(super) fn binary(&self, output: &str, op: &str, first: &str, second: &str) -> Self {
        self.project_operator(output, op, field_paths([first, second]))
    }

    /// `{$project: {output: {op: ["$a", "$b", ...]}}}`
    pub(super) fn variadic<I, S>(&self, output: &str, op: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.project_operator(output, op, field_paths(fields))
    }

    /// The accumulated stages, in execution order
    pub fn pipeline(&self) -> &[Document] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn into_pipeline(self) -> Vec<Document> {
        self.stages
    }

    /// Run the pipeline and return the executor's cursor
    #[instrument(skip_all, fields(operation = "aggregate", stages = self.stages.len()))]
    pub async fn execute<E: DocumentExecutor>(&self, executor: &E) -> Result<E::Cursor, E::Error> {
        debug!(pipeline = ?self.stages, "Executing aggregation");
        executor.aggregate(self.stages.clone()).await
    }

    /// Run the pipeline and collect every result document
    pub async fn to_list<E: DocumentExecutor>(&self, executor: &E) -> Result<Vec<Document>, E::Error> {
        let cursor = self.execute(executor).await?;
        cursor.try_collect().await
    }
}

impl From<AggregationBuilder> for Vec<Document> {
    fn from(builder: AggregationBuilder) -> Self {
        builder.stages
    }
}
