use rand::Rng;
use tracing::info;
use crate::core::types::{Collection, Record, RecordId};
use crate::schema::schema::{Field, Schema};

fn pick<'a>(domain: &'a [String], rng: &mut impl Rng) -> &'a str {
    &domain[rng.gen_range(0..domain.len())]
}

/// Populate a collection with `entries` random records, each field drawn
/// uniformly from its schema domain. Identifiers are sequential here,
/// but nothing downstream relies on that.
pub fn generate(schema: &Schema, entries: usize, rng: &mut impl Rng) -> Collection {
    let mut collection = Collection::with_capacity(entries);
    for id in 0..entries as u64 {
        collection.insert(Record::new(
            RecordId(id),
            pick(schema.domain(Field::Status), rng),
            pick(schema.domain(Field::City), rng),
            pick(schema.domain(Field::Delivery), rng),
        ));
    }
    info!(entries, "generated collection");
    collection
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generates_requested_entry_count() {
        let schema = Schema::orders();
        let mut rng = StdRng::seed_from_u64(42);
        let collection = generate(&schema, 250, &mut rng);
        assert_eq!(collection.len(), 250);
    }

    #[test]
    fn generated_values_stay_in_domain() {
        let schema = Schema::orders();
        let mut rng = StdRng::seed_from_u64(7);
        let collection = generate(&schema, 100, &mut rng);

        for (_, record) in collection.iter() {
            for field in Field::ALL {
                assert!(
                    schema.contains(field, record.value(field)),
                    "{} value {:?} outside domain",
                    field.name(),
                    record.value(field)
                );
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_collection() {
        let schema = Schema::orders();
        let a = generate(&schema, 50, &mut StdRng::seed_from_u64(9));
        let b = generate(&schema, 50, &mut StdRng::seed_from_u64(9));
        for (id, record) in a.iter() {
            assert_eq!(b.get(id), Some(record));
        }
    }
}
