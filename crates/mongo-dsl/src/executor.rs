//! The seam between the builders and whatever actually runs the documents.
//!
//! Builders hand their accumulated documents to a [`DocumentExecutor`] and
//! return its result or error exactly as received. The driver's
//! `Collection<Document>` is the production implementation; tests plug in
//! recording fakes.

use async_trait::async_trait;
use bson::Document;
use futures::Stream;
use mongodb::{
    error::Error as MongoError,
    options::{
        DeleteOptions as DriverDeleteOptions, FindOptions as DriverFindOptions,
        UpdateOptions as DriverUpdateOptions,
    },
    results::{DeleteResult, UpdateResult},
    Collection, Cursor,
};
use tracing::debug;

use crate::options::{DeleteOptions, FindOptions, UpdateOptions};

/// Executes filter, update, delete and pipeline documents.
#[async_trait]
pub trait DocumentExecutor: Send + Sync {
    /// Error surfaced unchanged to callers of the builders' execution methods.
    type Error: Send;
    /// Stream of result documents from `find` and `aggregate`.
    type Cursor: Stream<Item = Result<Document, Self::Error>> + Send + Unpin;
    type UpdateResult: Send;
    type DeleteResult: Send;

    async fn find(&self, filter: Document, options: FindOptions) -> Result<Self::Cursor, Self::Error>;

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, Self::Error>;

    async fn count_documents(&self, filter: Document) -> Result<u64, Self::Error>;

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> Result<Self::UpdateResult, Self::Error>;

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> Result<Self::UpdateResult, Self::Error>;

    async fn delete_one(
        &self,
        filter: Document,
        options: DeleteOptions,
    ) -> Result<Self::DeleteResult, Self::Error>;

    async fn delete_many(
        &self,
        filter: Document,
        options: DeleteOptions,
    ) -> Result<Self::DeleteResult, Self::Error>;

    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Self::Cursor, Self::Error>;
}

#[async_trait]
impl DocumentExecutor for Collection<Document> {
    type Error = MongoError;
    type Cursor = Cursor<Document>;
    type UpdateResult = UpdateResult;
    type DeleteResult = DeleteResult;

    async fn find(&self, filter: Document, options: FindOptions) -> Result<Cursor<Document>, MongoError> {
        debug!(collection = %self.name(), %filter, "find");
        Collection::find(self, filter)
            .with_options(DriverFindOptions::from(options))
            .await
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, MongoError> {
        debug!(collection = %self.name(), %filter, "find_one");
        Collection::find_one(self, filter).await
    }

    async fn count_documents(&self, filter: Document) -> Result<u64, MongoError> {
        debug!(collection = %self.name(), %filter, "count_documents");
        Collection::count_documents(self, filter).await
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> Result<UpdateResult, MongoError> {
        debug!(collection = %self.name(), %filter, %update, "update_one");
        Collection::update_one(self, filter, update)
            .with_options(DriverUpdateOptions::from(options))
            .await
    }

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> Result<UpdateResult, MongoError> {
        debug!(collection = %self.name(), %filter, %update, "update_many");
        Collection::update_many(self, filter, update)
            .with_options(DriverUpdateOptions::from(options))
            .await
    }

    async fn delete_one(&self, filter: Document, options: DeleteOptions) -> Result<DeleteResult, MongoError> {
        debug!(collection = %self.name(), %filter, "delete_one");
        Collection::delete_one(self, filter)
            .with_options(DriverDeleteOptions::from(options))
            .await
    }

    async fn delete_many(&self, filter: Document, options: DeleteOptions) -> Result<DeleteResult, MongoError> {
        debug!(collection = %self.name(), %filter, "delete_many");
        Collection::delete_many(self, filter)
            .with_options(DriverDeleteOptions::from(options))
            .await
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Cursor<Document>, MongoError> {
        debug!(collection = %self.name(), stages = pipeline.len(), "aggregate");
        Collection::aggregate(self, pipeline).await
    }
}
