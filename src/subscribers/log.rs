//! # LogWriter: stdout event printer
//!
//! The default way a simulation run is logged. Prints one line per event.
//!
//! ## Example output
//! ```text
//! [starting] initial free A1=1999 B1=2013 M1=1968
//! [started]
//! [parked] gate=17 vehicle=10017 type=A1 spot=0-12-88
//! [full] gate=18 vehicle=10018 type=B1
//! [unparked] gate=19 vehicle=10004 spot=3-1-9
//! [found] gate=20 vehicle=10011 spot=2-7-41
//! [failed] gate=21 vehicle=10002 err="vehicle 10002 not found"
//! [window-closed]
//! [all-gates-stopped] executions=52113 ...
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
///
/// With `verbose = false` only run-level events and failures are printed;
/// per-gate successes are skipped.
pub struct LogWriter {
    verbose: bool,
}

impl Default for LogWriter {
    fn default() -> Self {
        Self { verbose: true }
    }
}

impl LogWriter {
    /// Prints every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prints run-level events and failures only.
    #[must_use]
    pub fn quiet() -> Self {
        Self { verbose: false }
    }

    fn line(e: &Event) -> String {
        let gate = e.gate.unwrap_or_default();
        let vehicle = e.vehicle.unwrap_or_default();
        let spot = e.spot.map(|s| s.to_string()).unwrap_or_default();
        let code = e.category.map(|c| c.code()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::SimulationStarting => format!("[starting] {reason}"),
            EventKind::SimulationStarted => "[started]".to_string(),
            EventKind::ShutdownRequested => "[shutdown-requested]".to_string(),
            EventKind::WindowClosed => "[window-closed]".to_string(),
            EventKind::AllGatesStopped => format!("[all-gates-stopped] {reason}"),
            EventKind::GraceExceeded => "[grace-exceeded]".to_string(),
            EventKind::VehicleParked => {
                format!("[parked] gate={gate} vehicle={vehicle} type={code} spot={spot}")
            }
            EventKind::FacilityFull => format!("[full] gate={gate} vehicle={vehicle} type={code}"),
            EventKind::VehicleUnparked => {
                format!("[unparked] gate={gate} vehicle={vehicle} spot={spot}")
            }
            EventKind::VehicleFound => format!("[found] gate={gate} vehicle={vehicle} spot={spot}"),
            EventKind::OperationFailed => {
                format!("[failed] gate={gate} vehicle={vehicle} err={reason:?}")
            }
            EventKind::SubscriberOverflow => format!("[subscriber-overflow] {reason}"),
            EventKind::SubscriberPanicked => format!("[subscriber-panicked] {reason}"),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let routine = matches!(
            e.kind,
            EventKind::VehicleParked
                | EventKind::FacilityFull
                | EventKind::VehicleUnparked
                | EventKind::VehicleFound
        );
        if routine && !self.verbose {
            return;
        }
        println!("{}", Self::line(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }

    fn queue_capacity(&self) -> usize {
        8192
    }
}
