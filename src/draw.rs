//! Draw events emitted during generation.
//!
//! The generator never touches a rendering surface. It reports each finished
//! room or corridor segment to an injected sink, and the caller decides
//! whether to present events immediately or buffer them.

use glam::Vec3;

use crate::geometry::Rect;

/// One rectangle ready to be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawEvent {
    pub rect: Rect,
    pub color: Vec3,
    /// Filled quad when true, outline when false
    pub filled: bool,
}

/// Receiver for draw events, called synchronously as generation progresses
pub trait DrawSink {
    fn emit(&mut self, event: DrawEvent);
}

/// Simple collecting sink - events are pushed during generation, consumed
/// by the viewer or by tests afterwards
#[derive(Default)]
pub struct DrawQueue {
    events: Vec<DrawEvent>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = DrawEvent> + '_ {
        self.events.drain(..)
    }
}

impl DrawSink for DrawQueue {
    fn emit(&mut self, event: DrawEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COLOR_ROOM;

    fn event(x: i32) -> DrawEvent {
        DrawEvent {
            rect: Rect::new(x, 0, 3, 3),
            color: COLOR_ROOM,
            filled: true,
        }
    }

    #[test]
    fn test_queue_keeps_emission_order() {
        let mut queue = DrawQueue::new();
        queue.emit(event(1));
        queue.emit(event(2));
        queue.emit(event(3));

        let xs: Vec<i32> = queue.events().iter().map(|e| e.rect.x).collect();
        assert_eq!(xs, vec![1, 2, 3]);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = DrawQueue::new();
        queue.emit(event(1));
        queue.emit(event(2));

        assert_eq!(queue.drain().count(), 2);
        assert!(queue.is_empty());
    }
}
