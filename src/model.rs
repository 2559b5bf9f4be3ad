//! Core data types for the joystick overlay.
//! Pointer samples, the widget anchor, and the set of held arrow keys.

use serde::{Deserialize, Serialize};

pub const CONTAINER_DIAMETER: f64 = 100.0;
pub const HANDLE_DIAMETER: f64 = 60.0;
pub const DEAD_ZONE: f64 = 30.0;
pub const DRAG_HOLD_MS: u32 = 1000;
/// Distance from the bottom-left viewport corner at mount.
pub const CORNER_OFFSET: f64 = 20.0;
pub const GRIP_DIAMETER: f64 = 28.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Legacy `keyCode` / `which` value the host page listens for.
    pub fn key_code(self) -> u32 {
        match self {
            Direction::Left => 37,
            Direction::Up => 38,
            Direction::Right => 39,
            Direction::Down => 40,
        }
    }

    /// Value used for both `key` and `code`.
    pub fn key_name(self) -> &'static str {
        match self {
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
        }
    }

    fn slot(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Direction selected by a component below `-dead_zone`.
    pub fn negative(self) -> Direction {
        match self {
            Axis::Horizontal => Direction::Left,
            Axis::Vertical => Direction::Up,
        }
    }

    /// Direction selected by a component above `dead_zone`.
    pub fn positive(self) -> Direction {
        match self {
            Axis::Horizontal => Direction::Right,
            Axis::Vertical => Direction::Down,
        }
    }

    pub fn component(self, offset: Offset) -> f64 {
        match self {
            Axis::Horizontal => offset.dx,
            Axis::Vertical => offset.dy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPhase {
    Press,
    Release,
}

impl KeyPhase {
    pub fn event_type(self) -> &'static str {
        match self {
            KeyPhase::Press => "keydown",
            KeyPhase::Release => "keyup",
        }
    }
}

/// Edge-triggered change of one direction's held state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTransition {
    pub direction: Direction,
    pub phase: KeyPhase,
}

impl KeyTransition {
    pub fn press(direction: Direction) -> Self {
        Self { direction, phase: KeyPhase::Press }
    }

    pub fn release(direction: Direction) -> Self {
        Self { direction, phase: KeyPhase::Release }
    }
}

/// Screen coordinates of a single contact, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Displacement from the anchor center. Screen axes: +x right, +y down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn magnitude(self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Projects onto the circle of `radius` when longer, keeping the angle.
    pub fn clamped(self, radius: f64) -> Offset {
        let distance = self.magnitude();
        if distance <= radius {
            return self;
        }
        let angle = self.dy.atan2(self.dx);
        Offset {
            dx: radius * angle.cos(),
            dy: radius * angle.sin(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub center_x: f64,
    pub center_y: f64,
    /// Maximum knob displacement.
    pub radius: f64,
}

impl Anchor {
    /// Anchor for a widget of `diameter` sitting `corner_offset` px from the
    /// bottom-left corner of a viewport `viewport_height` px tall.
    pub fn docked(diameter: f64, corner_offset: f64, viewport_height: f64) -> Self {
        let radius = diameter / 2.0;
        Self {
            center_x: corner_offset + radius,
            center_y: viewport_height - corner_offset - radius,
            radius,
        }
    }

    pub fn offset_of(&self, sample: PointerSample) -> Offset {
        Offset::new(sample.x - self.center_x, sample.y - self.center_y)
    }

    /// Top-left corner of the widget's bounding box.
    pub fn origin(&self) -> (f64, f64) {
        (self.center_x - self.radius, self.center_y - self.radius)
    }
}

/// Held flag per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStateSet {
    held: [bool; 4],
}

impl KeyStateSet {
    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.slot()]
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        self.held[direction.slot()] = held;
    }

    #[cfg(test)]
    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.is_held(*d))
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        !self.held.iter().any(|h| *h)
    }

    /// Opposite directions are never held together.
    pub fn is_consistent(&self) -> bool {
        !(self.is_held(Direction::Left) && self.is_held(Direction::Right))
            && !(self.is_held(Direction::Up) && self.is_held(Direction::Down))
    }
}
