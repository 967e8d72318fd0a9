//! Conversion of native Rust values into canonical BSON.
//!
//! Every builder method that takes a value accepts `impl IntoBson`. Integers are
//! widened to `Int64` so that `equals("age", 25)` and
//! `equals("age", Bson::Int64(25))` produce the same document.

use bson::{oid::ObjectId, Bson, Document, Timestamp};
use chrono::{DateTime, Utc};

/// Total conversion into a BSON value.
pub trait IntoBson {
    fn into_bson(self) -> Bson;
}

impl IntoBson for Bson {
    fn into_bson(self) -> Bson {
        self
    }
}

impl IntoBson for &Bson {
    fn into_bson(self) -> Bson {
        self.clone()
    }
}

macro_rules! int64_into_bson {
    ($($ty:ty),*) => {
        $(
            impl IntoBson for $ty {
                fn into_bson(self) -> Bson {
                    Bson::Int64(i64::from(self))
                }
            }
        )*
    };
}

int64_into_bson!(i8, i16, i32, i64, u8, u16, u32);

impl IntoBson for isize {
    fn into_bson(self) -> Bson {
        Bson::Int64(self as i64)
    }
}

impl IntoBson for f32 {
    fn into_bson(self) -> Bson {
        Bson::Double(f64::from(self))
    }
}

impl IntoBson for f64 {
    fn into_bson(self) -> Bson {
        Bson::Double(self)
    }
}

impl IntoBson for bool {
    fn into_bson(self) -> Bson {
        Bson::Boolean(self)
    }
}

impl IntoBson for &str {
    fn into_bson(self) -> Bson {
        Bson::String(self.to_string())
    }
}

impl IntoBson for String {
    fn into_bson(self) -> Bson {
        Bson::String(self)
    }
}

impl IntoBson for &String {
    fn into_bson(self) -> Bson {
        Bson::String(self.clone())
    }
}

impl IntoBson for bson::DateTime {
    fn into_bson(self) -> Bson {
        Bson::DateTime(self)
    }
}

impl IntoBson for DateTime<Utc> {
    fn into_bson(self) -> Bson {
        Bson::DateTime(bson::DateTime::from_chrono(self))
    }
}

impl IntoBson for Timestamp {
    fn into_bson(self) -> Bson {
        Bson::Timestamp(self)
    }
}

impl IntoBson for ObjectId {
    fn into_bson(self) -> Bson {
        Bson::ObjectId(self)
    }
}

impl IntoBson for Document {
    fn into_bson(self) -> Bson {
        Bson::Document(self)
    }
}

impl<T: IntoBson> IntoBson for Vec<T> {
    fn into_bson(self) -> Bson {
        Bson::Array(self.into_iter().map(IntoBson::into_bson).collect())
    }
}

impl<T: IntoBson> IntoBson for Option<T> {
    fn into_bson(self) -> Bson {
        self.map_or(Bson::Null, IntoBson::into_bson)
    }
}

/// Collects any iterable of convertible values into a BSON array.
pub(crate) fn bson_array<I>(values: I) -> Bson
where
    I: IntoIterator,
    I::Item: IntoBson,
{
    Bson::Array(values.into_iter().map(IntoBson::into_bson).collect())
}
