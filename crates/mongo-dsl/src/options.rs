//! Execution options carried next to the accumulated documents.
//!
//! These are plain values owned by the builders; they are converted into the
//! driver's option structs only when a builder is executed.

use bson::Document;
use mongodb::options::{
    DeleteOptions as DriverDeleteOptions, FindOptions as DriverFindOptions,
    UpdateOptions as DriverUpdateOptions,
};

/// Read options accumulated by [`FilterBuilder`](crate::FilterBuilder).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<Document>,
    pub limit: Option<i64>,
    pub skip: Option<u64>,
    pub projection: Option<Document>,
}

/// Write options accumulated by [`UpdateBuilder`](crate::UpdateBuilder).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub upsert: bool,
    /// Conditions for filtered positional updates, in the order they were added.
    pub array_filters: Vec<Document>,
}

/// Delete options. Deletes currently carry no options of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOptions {}

impl From<FindOptions> for DriverFindOptions {
    fn from(options: FindOptions) -> Self {
        let mut driver = DriverFindOptions::default();
        driver.sort = options.sort;
        driver.limit = options.limit;
        driver.skip = options.skip;
        driver.projection = options.projection;
        driver
    }
}

impl From<UpdateOptions> for DriverUpdateOptions {
    fn from(options: UpdateOptions) -> Self {
        let mut driver = DriverUpdateOptions::default();
        driver.upsert = Some(options.upsert);
        if !options.array_filters.is_empty() {
            driver.array_filters = Some(options.array_filters);
        }
        driver
    }
}

impl From<DeleteOptions> for DriverDeleteOptions {
    fn from(_: DeleteOptions) -> Self {
        DriverDeleteOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_defaults_are_empty() {
        let find = FindOptions::default();
        assert!(find.sort.is_none());
        assert!(find.limit.is_none());
        assert!(find.skip.is_none());
        assert!(find.projection.is_none());

        let update = UpdateOptions::default();
        assert!(!update.upsert);
        assert!(update.array_filters.is_empty());
    }

    #[test]
    fn test_find_options_into_driver() {
        let options = FindOptions {
            sort: Some(doc! { "name": 1 }),
            limit: Some(10),
            skip: Some(5),
            projection: Some(doc! { "name": 1 }),
        };
        let driver: DriverFindOptions = options.into();
        assert_eq!(driver.sort, Some(doc! { "name": 1 }));
        assert_eq!(driver.limit, Some(10));
        assert_eq!(driver.skip, Some(5));
        assert_eq!(driver.projection, Some(doc! { "name": 1 }));
    }

    #[test]
    fn test_update_options_into_driver() {
        let driver: DriverUpdateOptions = UpdateOptions::default().into();
        assert_eq!(driver.upsert, Some(false));
        assert!(driver.array_filters.is_none());

        let driver: DriverUpdateOptions = UpdateOptions {
            upsert: true,
            array_filters: vec![doc! { "elem.grade": { "$gte": 85 } }],
        }
        .into();
        assert_eq!(driver.upsert, Some(true));
        assert_eq!(
            driver.array_filters,
            Some(vec![doc! { "elem.grade": { "$gte": 85 } }])
        );
    }
}
