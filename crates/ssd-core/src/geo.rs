//! Planar position type.
//!
//! The village world is a flat square measured in abstract cells, so plain
//! Euclidean geometry on `f32` is all the core needs.

/// A point in the 2-D world.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `true` if both coordinates are finite (not NaN / ±∞).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Move up to `step` units toward `target`, never overshooting it.
    pub fn step_toward(self, target: Position, step: f32) -> Position {
        let d = self.distance(target);
        if d <= step || d == 0.0 {
            return target;
        }
        let k = step / d;
        Position::new(self.x + (target.x - self.x) * k, self.y + (target.y - self.y) * k)
    }

    /// Move `step` units directly away from `threat`.  When standing on the
    /// threat there is no direction to flee in, so the agent steps along +x.
    pub fn step_away(self, threat: Position, step: f32) -> Position {
        let d = self.distance(threat);
        if d == 0.0 {
            return Position::new(self.x + step, self.y);
        }
        let k = step / d;
        Position::new(self.x + (self.x - threat.x) * k, self.y + (self.y - threat.y) * k)
    }

    /// Component-wise offset.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
