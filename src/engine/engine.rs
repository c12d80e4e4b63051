use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};
use crate::core::types::{Collection, Record, RecordId};
use crate::engine::filter::{Clause, Filter, Target, Values};
use crate::index::bucket::Bucket;
use crate::index::field_index::FieldIndex;
use crate::schema::schema::Field;

/// Evaluation algorithm for multi-clause filters. Single-clause filters
/// bypass both and take the single-field fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    CountIntersection,
    IterativeNarrowing,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::CountIntersection, Strategy::IterativeNarrowing];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::CountIntersection => "intersection",
            Strategy::IterativeNarrowing => "iterative",
        }
    }
}

/// Resolves filters against one built index and its source collection.
/// Written once against the bucket capability; the backend only changes
/// the cost profile, never the result set. Stateless between calls.
pub struct FilterEngine<'a, B: Bucket> {
    index: &'a FieldIndex<B>,
    collection: &'a Collection,
}

impl<'a, B: Bucket> FilterEngine<'a, B> {
    pub fn new(index: &'a FieldIndex<B>, collection: &'a Collection) -> Self {
        FilterEngine { index, collection }
    }

    /// Evaluate a filter into records borrowed from the collection.
    /// Unknown fields and out-of-domain values resolve to empty clause
    /// sets, which propagate to an empty result; they never error.
    pub fn evaluate(&self, filter: &Filter, strategy: Strategy) -> Vec<&'a Record> {
        match filter {
            Filter::Control => self.resolve_single(&control_clause()),
            Filter::Where(clauses) => match clauses.len() {
                0 => Vec::new(),
                1 => self.resolve_single(&clauses[0]),
                _ => match strategy {
                    Strategy::CountIntersection => self.count_intersection(clauses),
                    Strategy::IterativeNarrowing => self.iterative_narrowing(clauses),
                },
            },
        }
    }

    /// Fast path for a filter touching exactly one field: concatenating
    /// the value buckets is already the union, since buckets of one field
    /// are disjoint.
    fn resolve_single(&self, clause: &Clause) -> Vec<&'a Record> {
        self.materialize(self.clause_ids(clause))
    }

    /// Tally every identifier across the per-clause sets; a record
    /// matches iff its tally equals the clause count. Cost is the total
    /// bucket volume touched, independent of clause order.
    fn count_intersection(&self, clauses: &[Clause]) -> Vec<&'a Record> {
        let mut tally: HashMap<RecordId, usize> = HashMap::new();
        for clause in clauses {
            for id in self.clause_ids(clause) {
                *tally.entry(id).or_insert(0) += 1;
            }
        }

        let mut matched: Vec<RecordId> = tally
            .into_iter()
            .filter(|&(_, count)| count == clauses.len())
            .map(|(id, _)| id)
            .collect();
        matched.sort_unstable();
        self.materialize(matched)
    }

    /// Seed candidates from the smallest clause and narrow through the
    /// rest in ascending size order. Ties keep original clause order.
    /// Membership cost inside each step is the backend's contains cost.
    fn iterative_narrowing(&self, clauses: &[Clause]) -> Vec<&'a Record> {
        let sizes: Vec<usize> = clauses.iter().map(|c| self.clause_size(c)).collect();
        let mut order: Vec<usize> = (0..clauses.len()).collect();
        order.sort_by_key(|&i| sizes[i]);
        debug!(?order, ?sizes, "narrowing clause order");

        let mut candidates = self.clause_ids(&clauses[order[0]]);
        for &i in &order[1..] {
            let buckets = self.clause_buckets(&clauses[i]);
            candidates.retain(|&id| buckets.iter().any(|bucket| bucket.contains(id)));
            if candidates.is_empty() {
                break;
            }
        }
        self.materialize(candidates)
    }

    /// Flattened identifier set for one clause: the union across its ORed
    /// value buckets. Same-field buckets are disjoint, so concatenation
    /// is union once repeated values are skipped; repeats would otherwise
    /// inject the same bucket twice.
    fn clause_ids(&self, clause: &Clause) -> Vec<RecordId> {
        let Some(field) = self.clause_field(clause) else {
            return Vec::new();
        };
        let mut ids = Vec::new();
        let mut seen_values: Vec<&str> = Vec::new();
        for value in clause.values.as_slice() {
            if seen_values.contains(&value.as_str()) {
                continue;
            }
            seen_values.push(value);
            match self.index.bucket(field, value) {
                Some(bucket) => ids.extend(bucket.ids()),
                None => debug!(
                    field = field.name(),
                    value = %value,
                    "filter value outside the declared domain"
                ),
            }
        }
        ids
    }

    fn clause_buckets(&self, clause: &Clause) -> Vec<&B> {
        let Some(field) = self.clause_field(clause) else {
            return Vec::new();
        };
        let mut buckets = Vec::new();
        let mut seen_values: Vec<&str> = Vec::new();
        for value in clause.values.as_slice() {
            if seen_values.contains(&value.as_str()) {
                continue;
            }
            seen_values.push(value);
            if let Some(bucket) = self.index.bucket(field, value) {
                buckets.push(bucket);
            }
        }
        buckets
    }

    fn clause_size(&self, clause: &Clause) -> usize {
        self.clause_buckets(clause)
            .iter()
            .map(|bucket| bucket.len())
            .sum()
    }

    fn clause_field(&self, clause: &Clause) -> Option<Field> {
        match &clause.target {
            Target::Field(field) => Some(*field),
            Target::Unknown(name) => {
                warn!(field = %name, "filter references unknown field");
                None
            }
        }
    }

    fn materialize(&self, ids: Vec<RecordId>) -> Vec<&'a Record> {
        ids.into_iter()
            .filter_map(|id| self.collection.get(id))
            .collect()
    }
}

/// The control run is defined as the fixed single-field baseline
/// `{status: ACTIVE}`.
fn control_clause() -> Clause {
    Clause {
        target: Target::Field(Field::Status),
        values: Values::One("ACTIVE".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Record;
    use crate::index::bucket::{FastMarkerBucket, ListBucket, MarkerBucket, SetBucket};
    use crate::index::field_index::IndexBuilder;
    use crate::schema::schema::Schema;

    fn sample() -> (Collection, Schema) {
        let collection = vec![
            Record::new(RecordId(1), "ACTIVE", "Warszawa", "DHL"),
            Record::new(RecordId(2), "ACTIVE", "Wroclaw", "DPD"),
            Record::new(RecordId(3), "ERROR", "Warszawa", "DHL"),
            Record::new(RecordId(4), "IN_PROGRESS", "Warszawa", "UPS"),
            Record::new(RecordId(5), "ACTIVE", "Warszawa", "UPS"),
        ]
        .into_iter()
        .collect();
        (collection, Schema::orders())
    }

    fn sorted_ids(results: &[&Record]) -> Vec<u64> {
        let mut ids: Vec<u64> = results.iter().map(|r| r.id.value()).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn single_field_fast_path_unions_or_values() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<ListBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let filter = Filter::new().with_any(Field::Status, ["ACTIVE", "ERROR"]);
        let results = engine.evaluate(&filter, Strategy::CountIntersection);
        assert_eq!(sorted_ids(&results), vec![1, 2, 3, 5]);
    }

    #[test]
    fn multi_field_conjunction_agrees_across_strategies() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<SetBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let filter = Filter::new()
            .with(Field::Status, "ACTIVE")
            .with(Field::City, "Warszawa");
        let a = engine.evaluate(&filter, Strategy::CountIntersection);
        let b = engine.evaluate(&filter, Strategy::IterativeNarrowing);
        assert_eq!(sorted_ids(&a), vec![1, 5]);
        assert_eq!(sorted_ids(&a), sorted_ids(&b));
    }

    #[test]
    fn array_clause_membership_means_any_value_bucket() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<MarkerBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let filter = Filter::new()
            .with_any(Field::Status, ["ACTIVE", "IN_PROGRESS"])
            .with(Field::Delivery, "UPS");
        let results = engine.evaluate(&filter, Strategy::IterativeNarrowing);
        assert_eq!(sorted_ids(&results), vec![4, 5]);
    }

    #[test]
    fn out_of_domain_value_fails_soft() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<FastMarkerBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let filter = Filter::new().with(Field::City, "Berlin");
        for strategy in Strategy::ALL {
            assert!(engine.evaluate(&filter, strategy).is_empty());
        }

        // An empty clause drags the whole conjunction to empty.
        let filter = Filter::new()
            .with(Field::Status, "ACTIVE")
            .with(Field::City, "Berlin");
        for strategy in Strategy::ALL {
            assert!(engine.evaluate(&filter, strategy).is_empty());
        }
    }

    #[test]
    fn unknown_field_from_external_input_fails_soft() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<ListBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let filter = Filter::from_named(vec![
            ("status".to_string(), Values::One("ACTIVE".to_string())),
            ("priority".to_string(), Values::One("HIGH".to_string())),
        ]);
        for strategy in Strategy::ALL {
            assert!(engine.evaluate(&filter, strategy).is_empty());
        }
    }

    #[test]
    fn control_run_equals_active_status_filter() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<SetBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let control = engine.evaluate(&Filter::control(), Strategy::IterativeNarrowing);
        let explicit = engine.evaluate(
            &Filter::new().with(Field::Status, "ACTIVE"),
            Strategy::CountIntersection,
        );
        assert_eq!(sorted_ids(&control), sorted_ids(&explicit));
        assert_eq!(sorted_ids(&control), vec![1, 2, 5]);
    }

    #[test]
    fn empty_conjunction_resolves_to_empty() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<ListBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        for strategy in Strategy::ALL {
            assert!(engine.evaluate(&Filter::new(), strategy).is_empty());
        }
    }

    #[test]
    fn repeated_or_value_does_not_duplicate_results() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<ListBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let filter = Filter::new().with_any(Field::Status, ["ACTIVE", "ACTIVE"]);
        let results = engine.evaluate(&filter, Strategy::CountIntersection);
        assert_eq!(sorted_ids(&results), vec![1, 2, 5]);

        let filter = Filter::new()
            .with_any(Field::Status, ["ACTIVE", "ACTIVE"])
            .with(Field::City, "Warszawa");
        for strategy in Strategy::ALL {
            assert_eq!(sorted_ids(&engine.evaluate(&filter, strategy)), vec![1, 5]);
        }
    }

    #[test]
    fn intersection_results_ascend_by_id() {
        let (collection, schema) = sample();
        let index = IndexBuilder::new(&collection, &schema)
            .build::<MarkerBucket>()
            .unwrap();
        let engine = FilterEngine::new(&index, &collection);

        let filter = Filter::new()
            .with(Field::Status, "ACTIVE")
            .with(Field::City, "Warszawa");
        let results = engine.evaluate(&filter, Strategy::CountIntersection);
        let ids: Vec<u64> = results.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 5]);
    }
}
