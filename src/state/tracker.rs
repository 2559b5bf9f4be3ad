// Pointer stream (down -> move* -> up) for the joystick knob
use crate::model::{Anchor, KeyTransition, Offset, PointerSample};

use super::translator::GestureTranslator;

#[derive(Debug, Clone)]
pub struct PointerTracker {
    active: bool,
    /// Clamped offset the knob is drawn at.
    knob: Offset,
    translator: GestureTranslator,
}

impl PointerTracker {
    pub fn new(dead_zone: f64) -> Self {
        Self {
            active: false,
            knob: Offset::ZERO,
            translator: GestureTranslator::new(dead_zone),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn knob(&self) -> Offset {
        self.knob
    }

    #[cfg(test)]
    pub fn keys(&self) -> &crate::model::KeyStateSet {
        self.translator.keys()
    }

    pub fn pointer_down(&mut self, anchor: &Anchor, sample: PointerSample, out: &mut Vec<KeyTransition>) {
        self.active = true;
        self.track(anchor, sample, out);
    }

    /// Ignored unless a press is in progress.
    pub fn pointer_move(&mut self, anchor: &Anchor, sample: PointerSample, out: &mut Vec<KeyTransition>) {
        if self.active {
            self.track(anchor, sample, out);
        }
    }

    /// Ends the stream and releases every held key, whatever the last offset was.
    pub fn pointer_up(&mut self, out: &mut Vec<KeyTransition>) {
        self.active = false;
        self.knob = Offset::ZERO;
        self.translator.reset(out);
    }

    fn track(&mut self, anchor: &Anchor, sample: PointerSample, out: &mut Vec<KeyTransition>) {
        self.knob = self.translator.translate(anchor.offset_of(sample), anchor.radius, out);
    }
}
