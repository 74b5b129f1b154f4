//! Event bus for recording animation events

use crate::event::{AnimationEvent, AnimationListener};
use std::cell::RefCell;
use std::rc::Rc;

/// A simple event queue that the engine pushes to and the host drains.
///
/// Clones share the same queue, so one clone can be handed to the engine as
/// its listener while the host keeps another to drain from.
#[derive(Clone, Default)]
pub struct EventBus {
    events: Rc<RefCell<Vec<AnimationEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event onto the bus
    pub fn push(&self, event: AnimationEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&self) -> Vec<AnimationEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Count pending events of one kind without draining
    pub fn count(&self, kind: AnimationEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == kind).count()
    }
}

impl AnimationListener for EventBus {
    fn on_animation_start(&mut self) {
        self.push(AnimationEvent::Started);
    }

    fn on_animation_end(&mut self) {
        self.push(AnimationEvent::Ended);
    }
}
