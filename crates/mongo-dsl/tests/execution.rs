//! Execution tests driven through a recording executor.
//!
//! These verify that every terminal method hands the accumulated documents
//! and options to the executor untouched, and that executor errors come back
//! to the caller exactly as produced.

use std::sync::Mutex;

use async_trait::async_trait;
use bson::{doc, Document};
use futures::stream::{self, Iter, StreamExt};
use mongo_dsl::{
    AggregationBuilder, DeleteBuilder, DeleteOptions, DocumentExecutor, FilterBuilder, FindOptions, SortOrder,
    UpdateBuilder, UpdateOptions,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Find(Document, FindOptions),
    FindOne(Document),
    Count(Document),
    UpdateOne(Document, Document, UpdateOptions),
    UpdateMany(Document, Document, UpdateOptions),
    DeleteOne(Document, DeleteOptions),
    DeleteMany(Document, DeleteOptions),
    Aggregate(Vec<Document>),
}

#[derive(Debug, Clone, PartialEq)]
struct ExecutorError {
    code: i32,
    message: String,
}

type ResultStream = Iter<std::vec::IntoIter<Result<Document, ExecutorError>>>;

/// Records every call and answers with canned documents, or fails every call
/// with the configured error.
#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    documents: Vec<Document>,
    failure: Option<ExecutorError>,
}

impl RecordingExecutor {
    fn returning(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    fn failing(code: i32, message: &str) -> Self {
        Self {
            failure: Some(ExecutorError {
                code,
                message: message.to_string(),
            }),
            ..Self::default()
        }
    }

    fn record(&self, call: Call) -> Result<(), ExecutorError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn cursor(&self) -> ResultStream {
        let items: Vec<Result<Document, ExecutorError>> = self.documents.iter().cloned().map(Ok).collect();
        stream::iter(items)
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentExecutor for RecordingExecutor {
    type Error = ExecutorError;
    type Cursor = ResultStream;
    type UpdateResult = u64;
    type DeleteResult = u64;

    async fn find(&self, filter: Document, options: FindOptions) -> Result<Self::Cursor, Self::Error> {
        self.record(Call::Find(filter, options))?;
        Ok(self.cursor())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, Self::Error> {
        self.record(Call::FindOne(filter))?;
        Ok(self.documents.first().cloned())
    }

    async fn count_documents(&self, filter: Document) -> Result<u64, Self::Error> {
        self.record(Call::Count(filter))?;
        Ok(self.documents.len() as u64)
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> Result<Self::UpdateResult, Self::Error> {
        self.record(Call::UpdateOne(filter, update, options))?;
        Ok(1)
    }

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> Result<Self::UpdateResult, Self::Error> {
        self.record(Call::UpdateMany(filter, update, options))?;
        Ok(self.documents.len() as u64)
    }

    async fn delete_one(&self, filter: Document, options: DeleteOptions) -> Result<Self::DeleteResult, Self::Error> {
        self.record(Call::DeleteOne(filter, options))?;
        Ok(1)
    }

    async fn delete_many(&self, filter: Document, options: DeleteOptions) -> Result<Self::DeleteResult, Self::Error> {
        self.record(Call::DeleteMany(filter, options))?;
        Ok(self.documents.len() as u64)
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Self::Cursor, Self::Error> {
        self.record(Call::Aggregate(pipeline))?;
        Ok(self.cursor())
    }
}

fn users() -> Vec<Document> {
    vec![
        doc! { "name": "Ada", "age": 36 },
        doc! { "name": "Grace", "age": 45 },
    ]
}

#[tokio::test]
async fn test_find_forwards_filter_and_options() {
    let _ = tracing_subscriber::fmt::try_init();
    let executor = RecordingExecutor::returning(users());
    let query = FilterBuilder::new()
        .greater_than("age", 30)
        .sort("name", SortOrder::Descending)
        .skip(5)
        .limit(10)
        .select(["name"]);

    let cursor = query.find(&executor).await.unwrap();
    let names: Vec<String> = cursor
        .map(|doc| doc.unwrap().get_str("name").unwrap().to_string())
        .collect()
        .await;

    assert_eq!(names, vec!["Ada", "Grace"]);
    assert_eq!(
        executor.calls(),
        vec![Call::Find(
            doc! { "age": { "$gt": 30_i64 } },
            FindOptions {
                sort: Some(doc! { "name": -1 }),
                limit: Some(10),
                skip: Some(5),
                projection: Some(doc! { "name": 1 }),
            }
        )]
    );
}

#[tokio::test]
async fn test_to_list_collects_cursor() {
    let executor = RecordingExecutor::returning(users());
    let docs = FilterBuilder::new().to_list(&executor).await.unwrap();
    assert_eq!(docs, users());
    assert_eq!(executor.calls(), vec![Call::Find(Document::new(), FindOptions::default())]);
}

#[tokio::test]
async fn test_find_one_and_count() {
    let executor = RecordingExecutor::returning(users());
    let query = FilterBuilder::new().equals("name", "Ada").limit(1);

    let first = query.find_one(&executor).await.unwrap();
    let count = query.count(&executor).await.unwrap();

    assert_eq!(first, Some(doc! { "name": "Ada", "age": 36 }));
    assert_eq!(count, 2);
    assert_eq!(
        executor.calls(),
        vec![
            Call::FindOne(doc! { "name": "Ada" }),
            Call::Count(doc! { "name": "Ada" }),
        ]
    );
}

#[tokio::test]
async fn test_update_forwards_filter_update_and_options() {
    let executor = RecordingExecutor::default();
    let filter = FilterBuilder::new().equals("_id", 7);
    let update = UpdateBuilder::new()
        .set("status", "active")
        .set_at_filtered_position("grades", 50, "elem", doc! { "elem.score": { "$lt": 50 } })
        .upsert(true);

    let modified = update.update_one(&executor, &filter).await.unwrap();
    assert_eq!(modified, 1);

    update.update_many(&executor, &filter).await.unwrap();

    let expected_update = doc! { "$set": { "status": "active", "grades.$[elem]": 50_i64 } };
    let expected_options = UpdateOptions {
        upsert: true,
        array_filters: vec![doc! { "elem.score": { "$lt": 50 } }],
    };
    assert_eq!(
        executor.calls(),
        vec![
            Call::UpdateOne(doc! { "_id": 7_i64 }, expected_update.clone(), expected_options.clone()),
            Call::UpdateMany(doc! { "_id": 7_i64 }, expected_update, expected_options),
        ]
    );
}

#[tokio::test]
async fn test_delete_forwards_filter() {
    let executor = RecordingExecutor::returning(users());
    let delete = DeleteBuilder::new()
        .filter("status", "inactive")
        .or([doc! { "age": { "$lt": 18 } }]);

    assert_eq!(delete.delete_one(&executor).await.unwrap(), 1);
    assert_eq!(delete.delete_many(&executor).await.unwrap(), 2);

    let expected = doc! { "status": "inactive", "$or": [ { "age": { "$lt": 18 } } ] };
    assert_eq!(
        executor.calls(),
        vec![
            Call::DeleteOne(expected.clone(), DeleteOptions::default()),
            Call::DeleteMany(expected, DeleteOptions::default()),
        ]
    );
}

#[tokio::test]
async fn test_aggregate_forwards_pipeline_in_order() {
    let executor = RecordingExecutor::returning(vec![doc! { "_id": "null", "total": 81 }]);
    let pipeline = AggregationBuilder::new()
        .match_filter(&FilterBuilder::new().equals("status", "active"))
        .sum("age")
        .limit(1);

    let results = pipeline.to_list(&executor).await.unwrap();

    assert_eq!(results, vec![doc! { "_id": "null", "total": 81 }]);
    assert_eq!(
        executor.calls(),
        vec![Call::Aggregate(vec![
            doc! { "$match": { "status": "active" } },
            doc! { "$group": { "_id": "null", "total": { "$sum": "$age" } } },
            doc! { "$limit": 1 },
        ])]
    );
}

#[tokio::test]
async fn test_errors_pass_through_unchanged() {
    let _ = tracing_subscriber::fmt::try_init();
    let executor = RecordingExecutor::failing(11000, "E11000 duplicate key error");
    let expected = ExecutorError {
        code: 11000,
        message: "E11000 duplicate key error".to_string(),
    };
    let filter = FilterBuilder::new().equals("email", "ada@example.com");

    assert_eq!(filter.find(&executor).await.err(), Some(expected.clone()));
    assert_eq!(filter.find_one(&executor).await.unwrap_err(), expected);
    assert_eq!(filter.count(&executor).await.unwrap_err(), expected);
    assert_eq!(filter.to_list(&executor).await.unwrap_err(), expected);

    let update = UpdateBuilder::new().set("email", "ada@example.com");
    assert_eq!(update.update_one(&executor, &filter).await.unwrap_err(), expected);
    assert_eq!(update.update_many(&executor, &filter).await.unwrap_err(), expected);

    let delete = DeleteBuilder::new().filter("email", "ada@example.com");
    assert_eq!(delete.delete_one(&executor).await.unwrap_err(), expected);
    assert_eq!(delete.delete_many(&executor).await.unwrap_err(), expected);

    let pipeline = AggregationBuilder::new().count("n");
    assert_eq!(pipeline.execute(&executor).await.err(), Some(expected.clone()));
    assert_eq!(pipeline.to_list(&executor).await.unwrap_err(), expected);

    // One attempt per call, no retries
    assert_eq!(executor.calls().len(), 10);
}

#[test]
fn test_execution_does_not_consume_builder() {
    let executor = RecordingExecutor::default();
    let query = FilterBuilder::new().equals("a", 1);
    let snapshot = query.clone();

    tokio_test::block_on(async {
        query.count(&executor).await.unwrap();
        query.count(&executor).await.unwrap();
    });

    assert_eq!(query, snapshot);
    assert_eq!(executor.calls().len(), 2);
}
