use std::collections::{HashMap, HashSet};
use tracing::debug;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Collection, RecordId};
use crate::index::bucket::{Backend, Bucket};
use crate::schema::schema::{Field, Schema};

/// Secondary index over every schema field: for each field, a mapping
/// from each domain value to the bucket of matching record identifiers.
/// Derived data, rebuilt from a collection snapshot at any time;
/// read-only once built. Several instances, one per backend, may coexist
/// against the same collection.
#[derive(Debug)]
pub struct FieldIndex<B: Bucket> {
    buckets: [HashMap<String, B>; Field::COUNT],
}

impl<B: Bucket> FieldIndex<B> {
    pub fn backend(&self) -> Backend {
        B::BACKEND
    }

    /// Bucket for one (field, value) pair. `None` only for values outside
    /// the declared domain; every legal value got a bucket at build time.
    pub fn bucket(&self, field: Field, value: &str) -> Option<&B> {
        self.buckets[field.index()].get(value)
    }

    /// Explicit check of the partition invariant count-intersection
    /// depends on: per field, buckets are pairwise disjoint and their
    /// union is exactly the collection's identifier set.
    pub fn verify_partition(&self, collection: &Collection) -> Result<()> {
        for field in Field::ALL {
            let mut seen: HashSet<RecordId> = HashSet::with_capacity(collection.len());
            for (value, bucket) in &self.buckets[field.index()] {
                for id in bucket.ids() {
                    if !seen.insert(id) {
                        return Err(Error::new(
                            ErrorKind::InvalidState,
                            format!(
                                "record {:?} appears in more than one {} bucket (last: {:?})",
                                id,
                                field.name(),
                                value
                            ),
                        ));
                    }
                    if !collection.contains(id) {
                        return Err(Error::new(
                            ErrorKind::InvalidState,
                            format!("indexed record {:?} is not in the collection", id),
                        ));
                    }
                }
            }
            if seen.len() != collection.len() {
                return Err(Error::new(
                    ErrorKind::InvalidState,
                    format!(
                        "{} buckets cover {} of {} records",
                        field.name(),
                        seen.len(),
                        collection.len()
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Builds one `FieldIndex` per requested backend from a collection
/// snapshot. The collection is read-only throughout.
pub struct IndexBuilder<'a> {
    collection: &'a Collection,
    schema: &'a Schema,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(collection: &'a Collection, schema: &'a Schema) -> Self {
        IndexBuilder { collection, schema }
    }

    /// Pre-creates an empty bucket for every domain value, then populates
    /// in a single pass over the collection. A value outside the declared
    /// domain aborts the build; no partial index is returned.
    pub fn build<B: Bucket>(&self) -> Result<FieldIndex<B>> {
        let mut buckets: [HashMap<String, B>; Field::COUNT] = Default::default();

        for field in Field::ALL {
            let per_value = &mut buckets[field.index()];
            for value in self.schema.domain(field) {
                per_value.insert(value.clone(), B::default());
            }
        }

        for (id, record) in self.collection.iter() {
            for field in Field::ALL {
                let value = record.value(field);
                match buckets[field.index()].get_mut(value) {
                    Some(bucket) => bucket.insert(id),
                    None => {
                        return Err(Error::new(
                            ErrorKind::SchemaViolation,
                            format!(
                                "record {:?} has {} value {:?} outside the declared domain",
                                id,
                                field.name(),
                                value
                            ),
                        ));
                    }
                }
            }
        }

        debug!(
            backend = B::BACKEND.label(),
            records = self.collection.len(),
            "field index built"
        );

        Ok(FieldIndex { buckets })
    }
}
