use std::collections::{HashMap, HashSet};
use ahash::AHashMap;
use serde::{Serialize, Deserialize};
use crate::core::types::RecordId;

/// Names the four bucket representations. Used for run labels and
/// diagnostics; the representation itself is picked at build time via
/// the type parameter on `FieldIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    List,
    Marker,
    FastMarker,
    Set,
}

impl Backend {
    pub fn label(&self) -> &'static str {
        match self {
            Backend::List => "list",
            Backend::Marker => "marker-map",
            Backend::FastMarker => "fast-map",
            Backend::Set => "set",
        }
    }
}

/// One bucket: the identifiers of all records sharing one value for one
/// field. The four implementations are value-equivalent as sets and
/// differ only in membership-test and iteration cost.
pub trait Bucket: Default {
    const BACKEND: Backend;

    fn insert(&mut self, id: RecordId);

    fn contains(&self, id: RecordId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ids(&self) -> impl Iterator<Item = RecordId> + '_;
}

/// Append-only sequence. O(1) amortized insert, O(n) membership,
/// preserves insertion order. Uniqueness holds only because the builder
/// visits each record exactly once.
#[derive(Debug, Clone, Default)]
pub struct ListBucket(Vec<RecordId>);

impl Bucket for ListBucket {
    const BACKEND: Backend = Backend::List;

    fn insert(&mut self, id: RecordId) {
        self.0.push(id);
    }

    fn contains(&self, id: RecordId) -> bool {
        self.0.contains(&id)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.0.iter().copied()
    }
}

/// Standard hash map used as a set, identifier mapped to a unit marker.
/// O(1) average insert and membership, unordered.
#[derive(Debug, Clone, Default)]
pub struct MarkerBucket(HashMap<RecordId, ()>);

impl Bucket for MarkerBucket {
    const BACKEND: Backend = Backend::Marker;

    fn insert(&mut self, id: RecordId) {
        self.0.insert(id, ());
    }

    fn contains(&self, id: RecordId) -> bool {
        self.0.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.0.keys().copied()
    }
}

/// Same marker-map shape behind a different hasher, to compare
/// representation overhead against `MarkerBucket`.
#[derive(Debug, Clone, Default)]
pub struct FastMarkerBucket(AHashMap<RecordId, ()>);

impl Bucket for FastMarkerBucket {
    const BACKEND: Backend = Backend::FastMarker;

    fn insert(&mut self, id: RecordId) {
        self.0.insert(id, ());
    }

    fn contains(&self, id: RecordId) -> bool {
        self.0.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.0.keys().copied()
    }
}

/// Dedicated set structure; identifier uniqueness is intrinsic.
#[derive(Debug, Clone, Default)]
pub struct SetBucket(HashSet<RecordId>);

impl Bucket for SetBucket {
    const BACKEND: Backend = Backend::Set;

    fn insert(&mut self, id: RecordId) {
        self.0.insert(id);
    }

    fn contains(&self, id: RecordId) -> bool {
        self.0.contains(&id)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.0.iter().copied()
    }
}
