/// Dataset generator demo
///
/// Populates a random order collection and saves it as data_<n>.json for
/// the run_filters demo. Entry count comes from the first CLI argument,
/// defaulting to 10000.

use ordinex::dataset::{generator, io};
use ordinex::schema::schema::Schema;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let entries: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(10_000);

    println!("saving collection of {} entries...", entries);

    let schema = Schema::orders();
    let mut rng = rand::thread_rng();
    let collection = generator::generate(&schema, entries, &mut rng);

    let path = io::dataset_path(entries);
    io::save(&path, &collection)?;

    println!("File {:?} saved successfully", path);
    Ok(())
}
