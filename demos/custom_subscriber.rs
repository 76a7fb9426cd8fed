//! # Example: custom_subscriber
//!
//! Attaches a metrics subscriber to a short simulation run.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait.
//! - Inspect [`Event`] / [`EventKind`] for gate outcomes.
//! - Wire the subscriber into [`Simulation::builder`].
//!
//! ## Flow
//! ```text
//! Simulation::run()
//!     ├─► Gate::run() ──► publish(VehicleParked / FacilityFull / VehicleUnparked / ...)
//!     └─► fan_out (in Simulation)
//!           └─► SubscriberSet.emit() ──► GateMetrics.on_event()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example custom_subscriber
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parkvisor::{Event, EventKind, Simulation, SimulationConfig, Subscribe};

/// Counts gate outcomes per kind.
/// In real life, you could export metrics, ship logs, or trigger alerts.
#[derive(Default)]
struct GateMetrics {
    parked: AtomicU64,
    full: AtomicU64,
    unparked: AtomicU64,
    found: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl GateMetrics {
    fn print_stats(&self) {
        println!();
        println!("Gate metrics:");
        println!(" ├─► Parked:   {}", self.parked.load(Ordering::Relaxed));
        println!(" ├─► Full:     {}", self.full.load(Ordering::Relaxed));
        println!(" ├─► Unparked: {}", self.unparked.load(Ordering::Relaxed));
        println!(" ├─► Found:    {}", self.found.load(Ordering::Relaxed));
        println!(" ├─► Failed:   {}", self.failed.load(Ordering::Relaxed));
        println!(" └─► Dropped:  {}", self.dropped.load(Ordering::Relaxed));
    }
}

#[async_trait::async_trait]
impl Subscribe for GateMetrics {
    async fn on_event(&self, ev: &Event) {
        let counter = match ev.kind {
            EventKind::VehicleParked => &self.parked,
            EventKind::FacilityFull => &self.full,
            EventKind::VehicleUnparked => &self.unparked,
            EventKind::VehicleFound => &self.found,
            EventKind::OperationFailed => {
                println!(
                    "[metrics] failure at gate {}: {}",
                    ev.gate.unwrap_or_default(),
                    ev.reason.as_deref().unwrap_or("<none>")
                );
                &self.failed
            }
            EventKind::SubscriberOverflow => &self.dropped,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn name(&self) -> &'static str {
        "gate-metrics"
    }

    fn queue_capacity(&self) -> usize {
        65_536
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(GateMetrics::default());

    let cfg = SimulationConfig {
        floors: 2,
        columns: 50,
        rows: 50,
        gates: 8,
        duration: Duration::from_secs(1),
        warmup: Duration::ZERO,
        bus_capacity: 65_536,
        ..SimulationConfig::default()
    };

    let subs: Vec<Arc<dyn Subscribe>> = vec![metrics.clone()];
    let report = Simulation::builder(cfg)
        .with_subscribers(subs)
        .build()?
        .run()
        .await?;

    metrics.print_stats();
    println!("\n{report}");
    Ok(())
}
