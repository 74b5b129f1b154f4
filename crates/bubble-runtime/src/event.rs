//! Animation lifecycle events and the listener trait

use serde::Serialize;

/// A start/end transition of an engine's tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationEvent {
    /// The loop went from idle to running
    Started,
    /// The loop stopped, either because every bubble expired or because it was stopped
    Ended,
}

/// Receives notifications from an engine.
///
/// Callbacks run synchronously inside the call that caused the transition
/// (`spawn`, a timer tick, or `stop`).
pub trait AnimationListener {
    /// Notifies the start of the animation.
    fn on_animation_start(&mut self);

    /// Notifies the end of the animation.
    fn on_animation_end(&mut self);
}
