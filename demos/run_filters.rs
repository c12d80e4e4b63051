/// Filter comparison demo
///
/// Loads a data_<n>.json dataset (see the generate_dataset demo), builds
/// all four index backends, then runs every filter scenario through both
/// evaluation strategies on every backend, timing each combination and
/// cross-checking the results with the oracle.

use std::time::{Duration, Instant};
use tracing::warn;
use ordinex::core::types::Collection;
use ordinex::dataset::io;
use ordinex::engine::engine::{FilterEngine, Strategy};
use ordinex::engine::filter::Filter;
use ordinex::index::bucket::{Bucket, FastMarkerBucket, ListBucket, MarkerBucket, SetBucket};
use ordinex::index::field_index::{FieldIndex, IndexBuilder};
use ordinex::oracle::oracle::{LabeledRun, ResultOracle};
use ordinex::schema::schema::{Field, Schema};

struct RunConfig {
    build_warm_up_repeats: usize,
    build_repeats: usize,
    test_warm_up_repeats: usize,
    method_warm_up_repeats: usize,
    method_run_repeats: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            build_warm_up_repeats: 5,
            build_repeats: 10,
            test_warm_up_repeats: 10,
            method_warm_up_repeats: 1,
            method_run_repeats: 10,
        }
    }
}

/// Warm up, then time `repeats` executions. Returns the mean duration
/// per execution and the last result.
fn measure<R>(warm_up: usize, repeats: usize, mut f: impl FnMut() -> R) -> (Duration, R) {
    for _ in 0..warm_up {
        f();
    }

    let start = Instant::now();
    let mut result = None;
    for _ in 0..repeats {
        result = Some(f());
    }
    let time = start.elapsed() / repeats as u32;

    (time, result.expect("at least one run repeat"))
}

fn millis(time: Duration) -> f64 {
    time.as_secs_f64() * 1000.0
}

fn scenarios() -> Vec<Filter> {
    vec![
        Filter::control(),
        Filter::new().with(Field::Status, "ACTIVE"),
        Filter::new().with_any(Field::Status, ["ACTIVE", "IN_PROGRESS", "DELIVERED"]),
        Filter::new()
            .with_any(Field::Status, ["ACTIVE", "IN_PROGRESS", "DELIVERED"])
            .with_any(Field::City, ["Zakopane", "Katowice", "Bydgoszcz"]),
        Filter::new()
            .with(Field::Status, "ERROR")
            .with(Field::Delivery, "FedEx"),
        Filter::new()
            .with(Field::Status, "IN_PROGRESS")
            .with(Field::City, "Wroclaw")
            .with(Field::Delivery, "DPD"),
        Filter::new()
            .with_any(Field::Status, ["ACTIVE", "IN_PROGRESS", "DELIVERED"])
            .with(Field::City, "Warszawa")
            .with(Field::Delivery, "InPost"),
    ]
}

fn build_timed<B: Bucket>(builder: &IndexBuilder, config: &RunConfig) -> FieldIndex<B> {
    let (time, index) = measure(config.build_warm_up_repeats, config.build_repeats, || {
        builder
            .build::<B>()
            .expect("loaded collection conforms to the schema")
    });
    println!(" - {}: {:.1}ms", B::BACKEND.label(), millis(time));
    index
}

fn run_combination<'a, B: Bucket>(
    engine: &FilterEngine<'a, B>,
    filter: &Filter,
    strategy: Strategy,
    config: &RunConfig,
) -> LabeledRun {
    let label = format!("{}/{}", strategy.label(), B::BACKEND.label());
    let (time, results) = measure(
        config.method_warm_up_repeats,
        config.method_run_repeats,
        || engine.evaluate(filter, strategy),
    );
    println!(" - {}: {:.1}ms", label, millis(time));
    LabeledRun::new(label, &results)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let config = RunConfig::default();

    println!("===== DATA =====");
    let entries: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(10_000);

    let collection: Collection = match io::load(&io::dataset_path(entries)) {
        Ok(collection) => collection,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Dataset for {} entries not found. Please choose another number.", entries);
            std::process::exit(1);
        }
    };
    println!("Successfully loaded collection of {} entries", collection.len());

    let schema = Schema::orders();
    let builder = IndexBuilder::new(&collection, &schema);

    // Warm up the allocator and caches before anything is measured.
    measure(config.test_warm_up_repeats, config.test_warm_up_repeats, || {
        builder.build::<ListBucket>()
    });

    println!("===== INDEXES =====");
    let list_index = build_timed::<ListBucket>(&builder, &config);
    let marker_index = build_timed::<MarkerBucket>(&builder, &config);
    let fast_index = build_timed::<FastMarkerBucket>(&builder, &config);
    let set_index = build_timed::<SetBucket>(&builder, &config);

    let list_engine = FilterEngine::new(&list_index, &collection);
    let marker_engine = FilterEngine::new(&marker_index, &collection);
    let fast_engine = FilterEngine::new(&fast_index, &collection);
    let set_engine = FilterEngine::new(&set_index, &collection);

    let scenarios = scenarios();

    // Engine warm-up with the first scenario.
    measure(config.test_warm_up_repeats, config.test_warm_up_repeats, || {
        list_engine.evaluate(&scenarios[0], Strategy::CountIntersection)
    });

    for filter in &scenarios {
        match filter {
            Filter::Control => {
                println!("===== FILTER: CONTROL RUN =====");
                println!("(all results should be very close)");
            }
            _ => println!("===== FILTER: {}", filter),
        }

        let mut runs = Vec::new();
        for strategy in Strategy::ALL {
            runs.push(run_combination(&list_engine, filter, strategy, &config));
            runs.push(run_combination(&marker_engine, filter, strategy, &config));
            runs.push(run_combination(&fast_engine, filter, strategy, &config));
            runs.push(run_combination(&set_engine, filter, strategy, &config));
        }

        match ResultOracle::validate(&runs) {
            Ok(count) => println!("valid: OK ({} results)", count),
            Err(divergence) => {
                warn!(%divergence, "results validation failed");
                println!("ERROR: results validation FAILED! {}", divergence);
            }
        }
    }

    Ok(())
}
