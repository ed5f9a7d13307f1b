use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wd_worldgen::{TerrainKind, VegetationKind, VegetationTile};

use crate::chunk_store::ChunkStore;

/// A carved rectangular room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub center_x: i32,
    pub center_y: i32,
}

impl Room {
    fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            center_x: x + w / 2,
            center_y: y + h / 2,
        }
    }

    /// Whether the rooms intersect once each is grown by `margin` tiles.
    pub fn overlaps(&self, other: &Room, margin: i32) -> bool {
        self.x - margin < other.x + other.w
            && self.x + self.w + margin > other.x
            && self.y - margin < other.y + other.h
            && self.y + self.h + margin > other.y
    }
}

/// Hand-built rooms-and-corridors map written over the generated terrain.
///
/// Every tile becomes wall with a sprinkling of grass and bushes, then
/// non-overlapping rooms are carved out and joined by L-shaped corridors.
/// The outermost ring of tiles is never carved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonLayout {
    /// Number of room placements to try. `None` means one per 256 tiles of
    /// world area, at least 5.
    pub room_attempts: Option<usize>,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub grass_chance: f64,
    pub bush_chance: f64,
    /// Chance that a corridor segment is two tiles wide.
    pub wide_corridor_chance: f64,
    /// Chance, per room, of an extra corridor to a random room.
    pub extra_connection_chance: f64,
}

impl Default for DungeonLayout {
    fn default() -> Self {
        Self {
            room_attempts: None,
            min_room_size: 3,
            max_room_size: 5,
            grass_chance: 0.125,
            bush_chance: 0.05,
            wide_corridor_chance: 0.3,
            extra_connection_chance: 0.3,
        }
    }
}

impl DungeonLayout {
    pub fn with_room_attempts(mut self, attempts: usize) -> Self {
        self.room_attempts = Some(attempts);
        self
    }

    fn attempts(&self, width: i32, height: i32) -> usize {
        self.room_attempts
            .unwrap_or_else(|| ((width as usize * height as usize) / 256).max(5))
    }

    /// Write the layout into `chunks`, returning the rooms in carve order.
    pub fn apply(&self, chunks: &mut ChunkStore, rng: &mut StdRng) -> Vec<Room> {
        let bounds = chunks.bounds();
        let (width, height) = (bounds.width as i32, bounds.height as i32);

        for y in 0..height {
            for x in 0..width {
                chunks.set_terrain_at(x, y, TerrainKind::Wall);
                let mut vegetation = VegetationTile::NONE;
                if rng.random::<f64>() < self.grass_chance {
                    vegetation = VegetationTile::canonical(VegetationKind::Grass);
                }
                if rng.random::<f64>() < self.bush_chance {
                    vegetation = VegetationTile::canonical(VegetationKind::Bush);
                }
                chunks.set_vegetation_at(x, y, vegetation);
            }
        }

        let mut carver = Carver {
            chunks,
            width,
            height,
            wide_chance: self.wide_corridor_chance,
        };

        let mut rooms: Vec<Room> = Vec::new();
        let (min, max) = (self.min_room_size, self.max_room_size.max(self.min_room_size));
        for _ in 0..self.attempts(width, height) {
            let w = rng.random_range(min..=max);
            let h = rng.random_range(min..=max);
            if w >= width - 2 || h >= height - 2 {
                continue;
            }
            let x = rng.random_range(0..width - w - 2) + 1;
            let y = rng.random_range(0..height - h - 2) + 1;
            let candidate = Room::new(x, y, w, h);
            if rooms.iter().any(|room| candidate.overlaps(room, 1)) {
                continue;
            }
            carver.room(&candidate);
            rooms.push(candidate);
        }

        for pair in rooms.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let aligned = prev.center_x == next.center_x || prev.center_y == next.center_y;
            let horizontal_first = aligned || rng.random::<f64>() < 0.5;
            carver.connect(prev, next, horizontal_first, rng);
        }

        for room in &rooms[..rooms.len().saturating_sub(1)] {
            if rng.random::<f64>() < self.extra_connection_chance {
                let other = rooms[rng.random_range(0..rooms.len())];
                let horizontal_first = rng.random::<f64>() < 0.5;
                carver.connect(room, &other, horizontal_first, rng);
            }
        }

        debug!(rooms = rooms.len(), width, height, "applied dungeon layout");
        rooms
    }
}

struct Carver<'a> {
    chunks: &'a mut ChunkStore,
    width: i32,
    height: i32,
    wide_chance: f64,
}

impl Carver<'_> {
    fn floor(&mut self, x: i32, y: i32) {
        if x > 0 && x < self.width - 1 && y > 0 && y < self.height - 1 {
            self.chunks.set_terrain_at(x, y, TerrainKind::Empty);
        }
    }

    fn room(&mut self, room: &Room) {
        for y in room.y..room.y + room.h {
            for x in room.x..room.x + room.w {
                self.floor(x, y);
            }
        }
    }

    fn corridor_width(&self, rng: &mut StdRng) -> i32 {
        if rng.random::<f64>() < self.wide_chance {
            2
        } else {
            1
        }
    }

    fn horizontal(&mut self, x1: i32, x2: i32, y: i32, rng: &mut StdRng) {
        let span = self.corridor_width(rng);
        for x in x1.min(x2)..=x1.max(x2) {
            for dy in 0..span {
                self.floor(x, y + dy);
            }
        }
    }

    fn vertical(&mut self, y1: i32, y2: i32, x: i32, rng: &mut StdRng) {
        let span = self.corridor_width(rng);
        for y in y1.min(y2)..=y1.max(y2) {
            for dx in 0..span {
                self.floor(x + dx, y);
            }
        }
    }

    /// L-shaped corridor between the two room centers.
    fn connect(&mut self, a: &Room, b: &Room, horizontal_first: bool, rng: &mut StdRng) {
        if horizontal_first {
            self.horizontal(a.center_x, b.center_x, a.center_y, rng);
            self.vertical(a.center_y, b.center_y, b.center_x, rng);
        } else {
            self.vertical(a.center_y, b.center_y, a.center_x, rng);
            self.horizontal(a.center_x, b.center_x, b.center_y, rng);
        }
    }
}
