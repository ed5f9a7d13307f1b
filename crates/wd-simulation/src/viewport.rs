use serde::{Deserialize, Serialize};
use wd_core::Position;
use wd_worldgen::WorldBounds;

/// The window of world tiles currently on screen.
///
/// It is the sole input to level-of-detail assignment: whatever chunk sits
/// under its center runs at full fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Default edge length in tiles.
    pub const DEFAULT_SIZE: u32 = 25;

    /// A viewport at the origin, shrunk to fit inside `bounds`.
    pub fn new(width: u32, height: u32, bounds: WorldBounds) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width.min(bounds.width),
            height: height.min(bounds.height),
        }
    }

    /// Shift by `(dx, dy)`, staying inside `bounds`.
    pub fn move_by(&mut self, dx: i32, dy: i32, bounds: WorldBounds) {
        self.place(self.x.saturating_add(dx), self.y.saturating_add(dy), bounds);
    }

    /// Put `target` as close to the center as the world edges allow.
    pub fn center_on(&mut self, target: Position, bounds: WorldBounds) {
        let x = target.x.saturating_sub((self.width / 2) as i32);
        let y = target.y.saturating_sub((self.height / 2) as i32);
        self.place(x, y, bounds);
    }

    fn place(&mut self, x: i32, y: i32, bounds: WorldBounds) {
        self.x = clamp_axis(x, self.width, bounds.width);
        self.y = clamp_axis(y, self.height, bounds.height);
    }

    /// The tile at `(x + w/2, y + h/2)`.
    pub fn center(&self) -> Position {
        Position::new(
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Inclusive `(min, max)` corners. For an empty viewport `max` lies
    /// before `min`.
    pub fn bounds(&self) -> (Position, Position) {
        (
            Position::new(self.x, self.y),
            Position::new(
                self.x + self.width as i32 - 1,
                self.y + self.height as i32 - 1,
            ),
        )
    }

    /// Whether `pos` is on screen.
    pub fn contains(&self, pos: Position) -> bool {
        let (min, max) = self.bounds();
        pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
    }
}

fn clamp_axis(start: i32, span: u32, extent: u32) -> i32 {
    let max_start = extent.saturating_sub(span) as i32;
    start.clamp(0, max_start.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: WorldBounds = WorldBounds::new(100, 80);

    #[test]
    fn new_viewport_fits_the_world() {
        let vp = Viewport::new(25, 25, WorldBounds::new(10, 40));
        assert_eq!((vp.x, vp.y, vp.width, vp.height), (0, 0, 10, 25));
    }

    #[test]
    fn move_by_clamps_to_edges() {
        let mut vp = Viewport::new(25, 25, WORLD);
        vp.move_by(-5, -5, WORLD);
        assert_eq!((vp.x, vp.y), (0, 0));
        vp.move_by(500, 500, WORLD);
        assert_eq!((vp.x, vp.y), (75, 55));
        vp.move_by(-10, 0, WORLD);
        assert_eq!((vp.x, vp.y), (65, 55));
    }

    #[test]
    fn center_on_places_target_under_center() {
        let mut vp = Viewport::new(25, 25, WORLD);
        vp.center_on(Position::new(50, 40), WORLD);
        assert_eq!((vp.x, vp.y), (38, 28));
        assert_eq!(vp.center(), Position::new(50, 40));
    }

    #[test]
    fn center_on_near_corner_clamps() {
        let mut vp = Viewport::new(25, 25, WORLD);
        vp.center_on(Position::new(2, 79), WORLD);
        assert_eq!((vp.x, vp.y), (0, 55));
    }

    #[test]
    fn bounds_are_inclusive() {
        let vp = Viewport::new(25, 25, WORLD);
        assert_eq!(vp.bounds(), (Position::new(0, 0), Position::new(24, 24)));
        assert!(vp.contains(Position::new(24, 0)));
        assert!(!vp.contains(Position::new(25, 0)));
    }
}
