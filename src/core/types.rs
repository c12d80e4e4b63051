use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use crate::schema::schema::Field;

/// Stable record identifier. Unique and totally ordered; contiguity is
/// never assumed anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn new(id: u64) -> Self {
        RecordId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// A flat order record. Immutable once created; every field value must be
/// a member of the owning schema's domain for that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub status: String,
    pub city: String,
    pub delivery: String,
}

impl Record {
    pub fn new(
        id: RecordId,
        status: impl Into<String>,
        city: impl Into<String>,
        delivery: impl Into<String>,
    ) -> Self {
        Record {
            id,
            status: status.into(),
            city: city.into(),
            delivery: delivery.into(),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Status => &self.status,
            Field::City => &self.city,
            Field::Delivery => &self.delivery,
        }
    }
}

/// The materialized record set, keyed by identifier. Built once by a
/// loader or generator and treated as read-only while any index built
/// from it is live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    records: HashMap<RecordId, Record>,
}

impl Collection {
    pub fn new() -> Self {
        Collection {
            records: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Collection {
            records: HashMap::with_capacity(capacity),
        }
    }

    /// Insert during construction. Returns the previous record when the
    /// identifier was already present.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id, record)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.keys().copied()
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for record in iter {
            collection.insert(record);
        }
        collection
    }
}
