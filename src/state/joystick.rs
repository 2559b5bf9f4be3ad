use crate::config::JoystickConfig;
use crate::model::{Anchor, KeyTransition, Offset, PointerSample};

use super::relocator::{DragRelocator, HoldTicket};
use super::tracker::PointerTracker;

/// What the overlay needs to draw itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoystickView {
    pub anchor: Anchor,
    pub knob: Offset,
    pub dragging: bool,
}

/// All mutable widget state: anchor, knob tracking and drag relocation.
/// Knob operations return the transitions to deliver; callers hand them to a
/// `KeySink` once they no longer hold the controller.
pub struct JoystickController {
    anchor: Anchor,
    tracker: PointerTracker,
    relocator: DragRelocator,
}

impl JoystickController {
    pub fn new(config: &JoystickConfig, anchor: Anchor) -> Self {
        Self {
            anchor,
            tracker: PointerTracker::new(config.dead_zone),
            relocator: DragRelocator::default(),
        }
    }

    pub fn view(&self) -> JoystickView {
        JoystickView {
            anchor: self.anchor,
            knob: self.tracker.knob(),
            dragging: self.relocator.is_dragging(),
        }
    }

    #[cfg(test)]
    pub fn keys(&self) -> &crate::model::KeyStateSet {
        self.tracker.keys()
    }

    pub fn knob_active(&self) -> bool {
        self.tracker.is_active()
    }

    #[must_use]
    pub fn knob_down(&mut self, sample: PointerSample) -> Vec<KeyTransition> {
        let mut out = Vec::new();
        self.tracker.pointer_down(&self.anchor, sample, &mut out);
        out
    }

    #[must_use]
    pub fn knob_move(&mut self, sample: PointerSample) -> Vec<KeyTransition> {
        let mut out = Vec::new();
        self.tracker.pointer_move(&self.anchor, sample, &mut out);
        out
    }

    #[must_use]
    pub fn knob_up(&mut self) -> Vec<KeyTransition> {
        let mut out = Vec::new();
        self.tracker.pointer_up(&mut out);
        out
    }

    pub fn grip_down(&mut self, sample: PointerSample) -> HoldTicket {
        self.relocator.press(&self.anchor, sample)
    }

    pub fn hold_elapsed(&mut self, ticket: HoldTicket) -> bool {
        self.relocator.hold_elapsed(ticket)
    }

    pub fn grip_move(&mut self, sample: PointerSample) -> bool {
        self.relocator.pointer_move(&mut self.anchor, sample)
    }

    /// Returns the ticket of a hold timer that must be cancelled, if any.
    pub fn grip_up(&mut self) -> Option<HoldTicket> {
        self.relocator.release()
    }

    /// Viewport resized: keep the whole widget reachable.
    pub fn fit_viewport(&mut self, width: f64, height: f64) -> bool {
        self.relocator.confine(&mut self.anchor, width, height)
    }

    /// Focus lost or widget torn down: release all keys and end any drag.
    /// Also returns the ticket of a hold timer that must be cancelled.
    #[must_use]
    pub fn release_all(&mut self) -> (Vec<KeyTransition>, Option<HoldTicket>) {
        let released = self.knob_up();
        (released, self.grip_up())
    }
}
