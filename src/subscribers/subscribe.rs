//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into a
//! simulation. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) – they do **not** block gates
//!   nor other subscribers.
//! - Each subscriber declares its queue capacity via [`Subscribe::queue_capacity`].
//!   On overflow, events for that subscriber are **dropped** and a
//!   `SubscriberOverflow` event is published.
//!
//! ## Example
//! ```rust
//! use parkvisor::{Event, EventKind, Subscribe};
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! #[derive(Default)]
//! struct FullCounter(AtomicU64);
//!
//! #[async_trait::async_trait]
//! impl Subscribe for FullCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::FacilityFull {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "full-counter" }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for overflow/panic reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
