//! # Example: simulate
//!
//! Runs a small seeded simulation with the built-in [`LogWriter`] in quiet
//! mode and prints the report.
//!
//! Press Ctrl-C to close the window early; in-flight gates still finish.
//!
//! ## Run
//! ```bash
//! cargo run --example simulate
//! ```

use std::sync::Arc;
use std::time::Duration;

use parkvisor::{Category, LogWriter, Simulation, SimulationConfig, Subscribe};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = SimulationConfig {
        floors: 4,
        columns: 100,
        rows: 100,
        gates: 16,
        duration: Duration::from_secs(3),
        warmup: Duration::from_secs(1),
        seed: Some(2024),
        ..SimulationConfig::default()
    };

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::quiet())];
    let sim = Simulation::builder(cfg).with_subscribers(subs).build()?;

    let (free, head) = sim.facility().available_spot(Category::Automobile);
    println!("A1 free before the run: {free} (first: {:?})", head.first());

    let report = sim.run().await?;
    println!("\n{report}");
    println!("consistent: {}", report.is_consistent());
    Ok(())
}
