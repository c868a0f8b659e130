use crate::coords::WorldPos;

/// Answer to "can the actor stand here, and how fast does it move".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementInfo {
    pub allowed: bool,
    /// Multiplier applied to movement speed. Zero when not allowed.
    pub speed_factor: f64,
}

impl MovementInfo {
    pub const BLOCKED: MovementInfo = MovementInfo {
        allowed: false,
        speed_factor: 0.0,
    };

    pub const FREE: MovementInfo = MovementInfo {
        allowed: true,
        speed_factor: 1.0,
    };

    pub const fn slowed(speed_factor: f64) -> Self {
        Self {
            allowed: true,
            speed_factor,
        }
    }
}

/// Oracle answering traversability queries in world space.
///
/// Queries take `&mut self` because answering one may lazily generate the
/// part of the world that contains the point.
pub trait Traversability {
    fn movement_at(&mut self, pos: WorldPos) -> MovementInfo;

    /// True when the point is blocked.
    fn is_blocked(&mut self, pos: WorldPos) -> bool {
        !self.movement_at(pos).allowed
    }
}
