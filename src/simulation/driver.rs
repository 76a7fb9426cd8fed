//! # Simulation: bounded gate pool over one shared facility.
//!
//! The [`Simulation`] owns the facility, the run configuration and the
//! subscribers. [`Simulation::run`] opens a wall-clock window, admits one gate
//! per free permit until the window closes, waits for in-flight gates and
//! returns a [`SimulationReport`].
//!
//! ## Architecture
//! ```text
//! Simulation::builder(cfg) ──► .with_subscribers(..) ──► .build()? ──► run()
//!
//! run():
//!   fan_out(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   watch_signals() (optional) ─► token.cancel()
//!   publish SimulationStarting ─► warm-up ─► publish SimulationStarted
//!
//!   admission loop (until deadline or token cancelled):
//!     acquire permit (select! on deadline / token)
//!       └─► JoinSet.spawn(Gate { tick, .. }.run(rng))   (permit held by the gate)
//!
//!   publish WindowClosed
//!   wait_all_with_grace(cfg.grace):
//!     ├─ all joined  → publish AllGatesStopped → Ok(report)
//!     └─ timeout     → publish GraceExceeded   → Err(GraceExceeded)
//! ```
//!
//! ## Rules
//! - At most `gates_clamped()` gates run at once.
//! - No gate is admitted after the deadline or after cancellation.
//! - Every admitted gate is either joined and counted, or reported as outstanding.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use parkvisor::{Simulation, SimulationConfig};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), parkvisor::SimulationError> {
//!     let cfg = SimulationConfig {
//!         floors: 1,
//!         columns: 20,
//!         rows: 20,
//!         gates: 4,
//!         duration: Duration::from_millis(50),
//!         warmup: Duration::ZERO,
//!         seed: Some(42),
//!         handle_signals: false,
//!         ..SimulationConfig::default()
//!     };
//!
//!     let report = Simulation::builder(cfg).build()?.run().await?;
//!     assert!(report.is_consistent());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Semaphore, broadcast::error::RecvError, broadcast::error::TryRecvError};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::SimulationError;
use crate::events::{Bus, Event, EventKind};
use crate::facility::{Category, FacilityStats, ParkingFacility};
use crate::subscribers::{Subscribe, SubscriberSet};

use super::config::SimulationConfig;
use super::gate::{Gate, GateOutcome};
use super::ledger::Ledger;
use super::report::SimulationReport;
use super::shutdown;

/// Builder for a [`Simulation`].
pub struct SimulationBuilder {
    cfg: SimulationConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    facility: Option<Arc<ParkingFacility>>,
}

impl SimulationBuilder {
    /// Sets event subscribers.
    ///
    /// Each subscriber gets its own worker and bounded queue; see
    /// [`SubscriberSet`].
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Runs against an existing facility instead of seeding a new one.
    ///
    /// The grid size fields of the config are ignored in that case.
    pub fn with_facility(mut self, facility: Arc<ParkingFacility>) -> Self {
        self.facility = Some(facility);
        self
    }

    /// Validates the config and seeds the facility if none was given.
    ///
    /// Seeding visits every cell; large grids take a noticeable moment.
    pub fn build(self) -> Result<Simulation, SimulationError> {
        self.cfg.validate()?;

        let facility = match self.facility {
            Some(f) => f,
            None => {
                let builder = ParkingFacility::builder(self.cfg.dimensions()?);
                let builder = match self.cfg.seed {
                    Some(seed) => builder.seeded_with(&mut StdRng::seed_from_u64(seed)),
                    None => builder.seeded_with(&mut rand::rng()),
                };
                Arc::new(builder.build())
            }
        };

        Ok(Simulation {
            cfg: self.cfg,
            facility,
            subscribers: self.subscribers,
            token: CancellationToken::new(),
        })
    }
}

/// A configured gate run, ready to start.
pub struct Simulation {
    cfg: SimulationConfig,
    facility: Arc<ParkingFacility>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    token: CancellationToken,
}

impl Simulation {
    /// Starts building a simulation from `cfg`.
    pub fn builder(cfg: SimulationConfig) -> SimulationBuilder {
        SimulationBuilder {
            cfg,
            subscribers: Vec::new(),
            facility: None,
        }
    }

    /// The facility gates operate on.
    pub fn facility(&self) -> &Arc<ParkingFacility> {
        &self.facility
    }

    /// Token that closes the admission window early when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Runs the simulation to completion.
    ///
    /// # Errors
    /// [`SimulationError::GraceExceeded`] if gates are still running
    /// `cfg.grace` after the window closed.
    pub async fn run(self) -> Result<SimulationReport, SimulationError> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let done = CancellationToken::new();
        let set = SubscriberSet::new(self.subscribers.clone(), bus.clone());
        let listener = fan_out(&bus, set, done.clone());

        if self.cfg.handle_signals {
            shutdown::watch_signals(bus.clone(), self.token.clone());
        }

        let before = self.facility.stats();
        let starting = Event::new(EventKind::SimulationStarting);
        bus.publish(starting.with_reason(free_summary(&before)));

        tokio::select! {
            _ = time::sleep(self.cfg.warmup) => {}
            _ = self.token.cancelled() => {}
        }
        bus.publish(Event::new(EventKind::SimulationStarted));

        let result = self.admit_and_drain(&bus, before).await;
        if let Ok(report) = &result {
            let summary = format!(
                "executions={} parked={} unparked={} searched={} full={} failures={} remaining={}",
                report.executions,
                report.parked,
                report.unparked,
                report.searched,
                report.full,
                report.failures,
                report.remaining_parked
            );
            bus.publish(Event::new(EventKind::AllGatesStopped).with_reason(summary));
        }

        // Stops the signal watcher; the run is over either way.
        self.token.cancel();
        done.cancel();
        let _ = listener.await;
        result
    }

    async fn admit_and_drain(
        &self,
        bus: &Bus,
        before: FacilityStats,
    ) -> Result<SimulationReport, SimulationError> {
        let semaphore = Arc::new(Semaphore::new(self.cfg.gates_clamped()));
        let ledger = Arc::new(Ledger::new());
        let mut seeds = match self.cfg.seed {
            // Offset so gate draws differ from the layout draws.
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut report = SimulationReport::new(before);
        let mut set: JoinSet<GateOutcome> = JoinSet::new();
        let started = Instant::now();
        let window = time::sleep(self.cfg.duration);
        tokio::pin!(window);

        let mut tick: u64 = 0;
        loop {
            let permit = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = &mut window => break,
                res = semaphore.clone().acquire_owned() => match res {
                    Ok(permit) => permit,
                    Err(_closed) => break,
                },
            };

            let gate = Gate {
                tick,
                first_vehicle: self.cfg.first_vehicle,
                mix: self.cfg.mix,
                facility: Arc::clone(&self.facility),
                ledger: Arc::clone(&ledger),
                bus: bus.clone(),
            };
            let mut rng = StdRng::from_rng(&mut seeds);
            set.spawn(async move {
                let _permit = permit;
                gate.run(&mut rng)
            });
            tick += 1;

            while let Some(res) = set.try_join_next() {
                collect(&mut report, bus, res);
            }
        }

        report.executions = tick;
        report.interrupted = self.token.is_cancelled();
        bus.publish(Event::new(EventKind::WindowClosed));

        self.wait_all_with_grace(&mut set, &mut report, bus).await?;

        report.elapsed = started.elapsed();
        report.after = self.facility.stats();
        report.remaining_parked = ledger.len();
        Ok(report)
    }

    /// Joins every in-flight gate, bounded by the configured grace.
    async fn wait_all_with_grace(
        &self,
        set: &mut JoinSet<GateOutcome>,
        report: &mut SimulationReport,
        bus: &Bus,
    ) -> Result<(), SimulationError> {
        let drain = async {
            while let Some(res) = set.join_next().await {
                collect(report, bus, res);
            }
        };

        match self.cfg.grace_limit() {
            None => {
                drain.await;
                Ok(())
            }
            Some(grace) => {
                if time::timeout(grace, drain).await.is_ok() {
                    return Ok(());
                }
                bus.publish(Event::new(EventKind::GraceExceeded));
                let outstanding = set.len();
                set.abort_all();
                Err(SimulationError::GraceExceeded { grace, outstanding })
            }
        }
    }
}

fn collect(report: &mut SimulationReport, bus: &Bus, res: Result<GateOutcome, JoinError>) {
    match res {
        Ok(outcome) => report.record(&outcome),
        Err(e) => {
            report.failures += 1;
            bus.publish(Event::new(EventKind::OperationFailed).with_reason(format!("gate: {e}")));
        }
    }
}

fn free_summary(stats: &FacilityStats) -> String {
    format!(
        "initial free A1={} B1={} M1={}",
        stats.free_of(Category::Automobile),
        stats.free_of(Category::Bicycle),
        stats.free_of(Category::Motorcycle)
    )
}

/// Forwards bus events to the subscriber set until `done`, then drains what
/// is left and shuts the set down.
fn fan_out(bus: &Bus, set: SubscriberSet, done: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
                _ = done.cancelled() => {
                    loop {
                        match rx.try_recv() {
                            Ok(ev) => set.emit(&ev),
                            Err(TryRecvError::Lagged(_)) => continue,
                            Err(_) => break,
                        }
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Dimensions;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    fn small(gates: usize, millis: u64) -> SimulationConfig {
        SimulationConfig {
            floors: 2,
            columns: 10,
            rows: 10,
            gates,
            duration: Duration::from_millis(millis),
            warmup: Duration::ZERO,
            grace: Duration::from_secs(10),
            seed: Some(7),
            handle_signals: false,
            ..SimulationConfig::default()
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            if !ev.is_gate_event() {
                self.0.lock().push(ev.kind);
            }
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn queue_capacity(&self) -> usize {
            1 << 20
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn run_is_consistent_and_failure_free() {
        let report = Simulation::builder(small(8, 150))
            .build()
            .unwrap()
            .run()
            .await
            .unwrap();

        assert!(report.executions > 0);
        assert_eq!(report.completed(), report.executions);
        assert_eq!(report.failures, 0, "{report}");
        assert!(report.is_consistent(), "{report}");
        assert!(!report.interrupted);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn subscribers_see_run_lifecycle() {
        let rec = Arc::new(Recorder::default());
        let cfg = SimulationConfig {
            bus_capacity: 1 << 16,
            ..small(2, 20)
        };
        Simulation::builder(cfg)
            .with_subscribers(vec![rec.clone()])
            .build()
            .unwrap()
            .run()
            .await
            .unwrap();

        let kinds = rec.0.lock().clone();
        let lifecycle: Vec<_> = kinds
            .into_iter()
            .filter(|k| *k != EventKind::SubscriberOverflow)
            .collect();
        assert_eq!(
            lifecycle,
            vec![
                EventKind::SimulationStarting,
                EventKind::SimulationStarted,
                EventKind::WindowClosed,
                EventKind::AllGatesStopped,
            ]
        );
    }

    struct AlwaysPanics;

    #[async_trait]
    impl Subscribe for AlwaysPanics {
        async fn on_event(&self, _ev: &Event) {
            panic!("always");
        }
        fn name(&self) -> &'static str {
            "always-panics"
        }
        fn queue_capacity(&self) -> usize {
            1 << 20
        }
    }

    /// Counts panic reports and events that are not about subscribers.
    #[derive(Default)]
    struct Tally(Mutex<(usize, usize)>);

    #[async_trait]
    impl Subscribe for Tally {
        async fn on_event(&self, ev: &Event) {
            let mut counts = self.0.lock();
            if ev.kind == EventKind::SubscriberPanicked {
                counts.0 += 1;
            } else if !ev.is_subscriber_event() {
                counts.1 += 1;
            }
        }
        fn name(&self) -> &'static str {
            "tally"
        }
        fn queue_capacity(&self) -> usize {
            1 << 20
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panicking_subscriber_does_not_feed_itself() {
        let tally = Arc::new(Tally::default());
        let cfg = SimulationConfig {
            bus_capacity: 1 << 16,
            ..small(2, 30)
        };
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(AlwaysPanics), tally.clone()];
        let report = Simulation::builder(cfg)
            .with_subscribers(subs)
            .build()
            .unwrap()
            .run()
            .await
            .unwrap();

        let (panics, delivered) = *tally.0.lock();
        assert!(panics > 0);
        assert!(
            panics <= delivered,
            "{panics} panic reports for {delivered} events"
        );
        assert!(report.is_consistent(), "{report}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancelled_before_start_admits_nothing() {
        let sim = Simulation::builder(SimulationConfig {
            warmup: Duration::from_secs(60),
            duration: Duration::from_secs(60),
            ..small(4, 0)
        })
        .build()
        .unwrap();
        sim.cancellation_token().cancel();

        let report = sim.run().await.unwrap();
        assert!(report.interrupted);
        assert_eq!(report.executions, 0);
        assert_eq!(report.before, report.after);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn inactive_facility_only_reports_full() {
        let dims = Dimensions::new(1, 4, 4).unwrap();
        let facility = Arc::new(
            ParkingFacility::builder(dims)
                .with_layout(|_| Category::Inactive)
                .build(),
        );
        let report = Simulation::builder(small(3, 30))
            .with_facility(Arc::clone(&facility))
            .build()
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.parked, 0);
        assert_eq!(report.unparked + report.searched, 0);
        assert_eq!(report.full + report.idle, report.executions);
        assert!(report.is_consistent());
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_gates_exceed_grace() {
        let sim = Simulation::builder(SimulationConfig {
            grace: Duration::from_secs(2),
            ..small(1, 0)
        })
        .build()
        .unwrap();
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        let mut set: JoinSet<GateOutcome> = JoinSet::new();
        set.spawn(std::future::pending());
        set.spawn(async { GateOutcome::Idle });
        let mut report = SimulationReport::new(sim.facility().stats());

        let err = sim
            .wait_all_with_grace(&mut set, &mut report, &bus)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::GraceExceeded { outstanding: 1, .. }
        ));
        assert_eq!(report.idle, 1);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::GraceExceeded);
    }

    #[test]
    fn build_rejects_invalid_config() {
        let cfg = SimulationConfig {
            mix: crate::OperationMix {
                park: 0,
                unpark: 0,
                search: 0,
            },
            ..SimulationConfig::default()
        };
        let err = Simulation::builder(cfg).build().err().unwrap();
        assert_eq!(err.as_label(), "simulation_invalid_config");
    }
}
