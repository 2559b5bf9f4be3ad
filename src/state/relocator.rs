// Hold-to-drag relocation of the whole widget via the grip
use crate::model::{Anchor, Offset, PointerSample};

/// Identifies one armed hold timer. A timer firing with a stale ticket is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoldTicket(u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPhase {
    Idle,
    /// Grip pressed, hold timer running.
    Pending { ticket: HoldTicket, grab: Offset },
    Dragging { grab: Offset },
}

#[derive(Debug, Clone)]
pub struct DragRelocator {
    phase: DragPhase,
    next_ticket: u32,
}

impl Default for DragRelocator {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            next_ticket: 0,
        }
    }
}

impl DragRelocator {
    #[cfg(test)]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Grip pressed. Records the grab offset and returns the ticket the hold
    /// timer must present when it fires.
    pub fn press(&mut self, anchor: &Anchor, sample: PointerSample) -> HoldTicket {
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = HoldTicket(self.next_ticket);
        let grab = Offset::new(sample.x - anchor.center_x, sample.y - anchor.center_y);
        self.phase = DragPhase::Pending { ticket, grab };
        ticket
    }

    /// Hold timer fired. Returns true when this switched the widget into drag mode.
    pub fn hold_elapsed(&mut self, ticket: HoldTicket) -> bool {
        match self.phase {
            DragPhase::Pending { ticket: armed, grab } if armed == ticket => {
                self.phase = DragPhase::Dragging { grab };
                true
            }
            _ => false,
        }
    }

    /// Moves the anchor under the pointer while dragging. Returns true if the anchor changed.
    pub fn pointer_move(&mut self, anchor: &mut Anchor, sample: PointerSample) -> bool {
        let DragPhase::Dragging { grab } = self.phase else {
            return false;
        };
        let center_x = sample.x - grab.dx;
        let center_y = sample.y - grab.dy;
        if center_x == anchor.center_x && center_y == anchor.center_y {
            return false;
        }
        anchor.center_x = center_x;
        anchor.center_y = center_y;
        true
    }

    /// Pulls the anchor back inside a `width` x `height` viewport, e.g. after
    /// a rotation. Returns true if it moved.
    pub fn confine(&self, anchor: &mut Anchor, width: f64, height: f64) -> bool {
        let fit = |center: f64, extent: f64| center.min(extent - anchor.radius).max(anchor.radius);
        let center_x = fit(anchor.center_x, width);
        let center_y = fit(anchor.center_y, height);
        if center_x == anchor.center_x && center_y == anchor.center_y {
            return false;
        }
        anchor.center_x = center_x;
        anchor.center_y = center_y;
        true
    }

    /// Grip released. Returns the ticket of a hold timer that should now be
    /// cancelled, if one was still running.
    pub fn release(&mut self) -> Option<HoldTicket> {
        let pending = match self.phase {
            DragPhase::Pending { ticket, .. } => Some(ticket),
            _ => None,
        };
        self.phase = DragPhase::Idle;
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> Anchor {
        Anchor { center_x: 70.0, center_y: 730.0, radius: 50.0 }
    }

    #[test]
    fn held_grip_drags_anchor_by_pointer_delta() {
        let mut a = anchor();
        let mut r = DragRelocator::default();
        let down = PointerSample::new(115.0, 685.0);
        let ticket = r.press(&a, down);
        assert!(r.hold_elapsed(ticket));
        assert!(r.is_dragging());
        assert!(r.pointer_move(&mut a, PointerSample::new(down.x + 140.0, down.y - 300.0)));
        assert_eq!((a.center_x, a.center_y), (210.0, 430.0));
        assert_eq!(a.radius, 50.0);
        assert_eq!(r.release(), None);
        assert_eq!(r.phase(), DragPhase::Idle);
    }

    #[test]
    fn early_release_cancels_and_leaves_anchor() {
        let mut a = anchor();
        let mut r = DragRelocator::default();
        let ticket = r.press(&a, PointerSample::new(115.0, 685.0));
        assert_eq!(r.release(), Some(ticket));
        assert!(!r.hold_elapsed(ticket));
        assert!(!r.pointer_move(&mut a, PointerSample::new(300.0, 300.0)));
        assert_eq!(a, anchor());
    }

    #[test]
    fn moves_while_pending_do_nothing() {
        let mut a = anchor();
        let mut r = DragRelocator::default();
        r.press(&a, PointerSample::new(115.0, 685.0));
        assert!(!r.pointer_move(&mut a, PointerSample::new(200.0, 600.0)));
        assert_eq!(a, anchor());
    }

    #[test]
    fn stale_ticket_from_earlier_press_is_ignored() {
        let a = anchor();
        let mut r = DragRelocator::default();
        let first = r.press(&a, PointerSample::new(115.0, 685.0));
        r.release();
        let second = r.press(&a, PointerSample::new(115.0, 685.0));
        assert_ne!(first, second);
        assert!(!r.hold_elapsed(first));
        assert!(!r.is_dragging());
        assert!(r.hold_elapsed(second));
    }

    #[test]
    fn confine_pulls_offscreen_anchor_back_into_view() {
        // docked for an 800px tall portrait viewport, then rotated to 800x400
        let mut a = anchor();
        let r = DragRelocator::default();
        assert!(r.confine(&mut a, 800.0, 400.0));
        assert_eq!((a.center_x, a.center_y), (70.0, 350.0));
        assert!(!r.confine(&mut a, 800.0, 400.0));

        let mut far = Anchor { center_x: 1200.0, center_y: -30.0, radius: 50.0 };
        assert!(r.confine(&mut far, 800.0, 400.0));
        assert_eq!((far.center_x, far.center_y), (750.0, 50.0));
    }

    #[test]
    fn confine_leaves_visible_anchor_alone() {
        let mut a = anchor();
        assert!(!DragRelocator::default().confine(&mut a, 400.0, 800.0));
        assert_eq!(a, anchor());
    }

    #[test]
    fn moving_to_same_spot_reports_no_change() {
        let mut a = anchor();
        let mut r = DragRelocator::default();
        let down = PointerSample::new(115.0, 685.0);
        let ticket = r.press(&a, down);
        r.hold_elapsed(ticket);
        assert!(!r.pointer_move(&mut a, down));
    }
}
