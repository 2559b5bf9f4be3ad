// Offset -> arrow key state, edge-triggered
use crate::model::{Axis, Direction, KeyStateSet, KeyTransition, Offset};

#[derive(Debug, Clone)]
pub struct GestureTranslator {
    dead_zone: f64,
    keys: KeyStateSet,
}

impl GestureTranslator {
    pub fn new(dead_zone: f64) -> Self {
        Self {
            dead_zone,
            keys: KeyStateSet::default(),
        }
    }

    #[cfg(test)]
    pub fn keys(&self) -> &KeyStateSet {
        &self.keys
    }

    /// Clamps `raw` to `radius`, updates the held keys and appends one
    /// transition per changed direction to `out`. Returns the clamped offset.
    pub fn translate(&mut self, raw: Offset, radius: f64, out: &mut Vec<KeyTransition>) -> Offset {
        let offset = raw.clamped(radius);
        if offset.dx.abs() <= self.dead_zone && offset.dy.abs() <= self.dead_zone {
            self.reset(out);
            return offset;
        }
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let wanted = resolve_axis(axis, axis.component(offset), self.dead_zone);
            self.sync_axis(axis, wanted, out);
        }
        debug_assert!(self.keys.is_consistent());
        offset
    }

    /// Releases every held direction.
    pub fn reset(&mut self, out: &mut Vec<KeyTransition>) {
        for direction in Direction::ALL {
            if self.keys.is_held(direction) {
                self.keys.set(direction, false);
                out.push(KeyTransition::release(direction));
            }
        }
    }

    fn sync_axis(&mut self, axis: Axis, wanted: Option<Direction>, out: &mut Vec<KeyTransition>) {
        let pair = [axis.negative(), axis.positive()];
        // releases first so a flip never shows both held
        for direction in pair {
            if self.keys.is_held(direction) && wanted != Some(direction) {
                self.keys.set(direction, false);
                out.push(KeyTransition::release(direction));
            }
        }
        if let Some(direction) = wanted {
            if !self.keys.is_held(direction) {
                self.keys.set(direction, true);
                out.push(KeyTransition::press(direction));
            }
        }
    }
}

/// Direction an axis component selects; `None` inside `[-dead_zone, dead_zone]`.
fn resolve_axis(axis: Axis, value: f64, dead_zone: f64) -> Option<Direction> {
    if value < -dead_zone {
        Some(axis.negative())
    } else if value > dead_zone {
        Some(axis.positive())
    } else {
        None
    }
}
