//! Bubble Runtime - Host-facing ports for the animation loop
//!
//! Provides the pieces the engine consumes from its host:
//! - `Scheduler` — single-shot delayed timer port, plus `ManualScheduler`,
//!   a virtual-clock implementation for headless hosts and tests
//! - `AnimationListener` — start/end notification callbacks
//! - `AnimationEvent` / `EventBus` — shared event queue that records notifications

mod event;
mod event_bus;
mod scheduler;

pub use event::{AnimationEvent, AnimationListener};
pub use event_bus::EventBus;
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle};
