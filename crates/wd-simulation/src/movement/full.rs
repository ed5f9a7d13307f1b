use std::cmp::Reverse;

use wd_core::{AiMode, Direction, EntityId, Position};

use super::{attempt_step, random_direction};
use crate::context::SimContext;
use crate::error::SimResult;

/// AI-driven step for a creature in the full-fidelity chunk.
pub(super) fn step(ctx: &mut SimContext<'_>, id: EntityId, from: Position) -> SimResult<()> {
    if let Some(dir) = choose_direction(ctx, id, from) {
        attempt_step(ctx, id, from, dir, true)?;
    }
    Ok(())
}

fn choose_direction(ctx: &mut SimContext<'_>, id: EntityId, from: Position) -> Option<Direction> {
    let ai = ctx.world.entities.ai(id).unwrap_or_default();
    let candidates = match ai.mode {
        AiMode::Engaged => return None,
        AiMode::Idle => Vec::new(),
        AiMode::Chase | AiMode::Flee => {
            match ai.target.and_then(|t| ctx.world.entities.position(t)) {
                Some(target) if ai.mode == AiMode::Chase => chase_directions(from, target),
                Some(threat) => flee_directions(from, threat),
                None => Vec::new(),
            }
        }
    };

    for dir in candidates {
        let to = from.step(dir);
        if ctx.world.can_entity_walk_to(Some(id), to.x, to.y).ok {
            return Some(dir);
        }
    }
    Some(random_direction(ctx.rng))
}

/// Steps that close in on `target`, dominant axis first. Ties favour x.
pub fn chase_directions(from: Position, target: Position) -> Vec<Direction> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    let (first, second) = if dx.abs() >= dy.abs() {
        (Direction::along_x(dx), Direction::along_y(dy))
    } else {
        (Direction::along_y(dy), Direction::along_x(dx))
    };
    first.into_iter().chain(second).collect()
}

/// Steps that strictly increase the distance to `threat`, farthest first.
/// Equal distances keep the +x, -x, +y, -y order.
pub fn flee_directions(from: Position, threat: Position) -> Vec<Direction> {
    let current = from.manhattan(threat);
    let mut dirs: Vec<(Direction, u32)> = Direction::CARDINALS
        .iter()
        .map(|&d| (d, from.step(d).manhattan(threat)))
        .filter(|&(_, dist)| dist > current)
        .collect();
    dirs.sort_by_key(|&(_, dist)| Reverse(dist));
    dirs.into_iter().map(|(d, _)| d).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::SimLevel;
    use crate::event::SimEventKind;
    use crate::movement::harness::Harness;
    use wd_core::AiState;
    use wd_worldgen::TerrainKind;

    #[test]
    fn chase_prefers_dominant_axis() {
        let from = Position::new(5, 5);
        assert_eq!(
            chase_directions(from, Position::new(9, 7)),
            vec![Direction::East, Direction::South]
        );
        assert_eq!(
            chase_directions(from, Position::new(4, 1)),
            vec![Direction::North, Direction::West]
        );
        // equal offsets go along x first
        assert_eq!(
            chase_directions(from, Position::new(2, 8)),
            vec![Direction::West, Direction::South]
        );
        assert_eq!(
            chase_directions(from, Position::new(5, 9)),
            vec![Direction::South]
        );
        assert!(chase_directions(from, from).is_empty());
    }

    #[test]
    fn flee_orders_by_distance_then_enumeration() {
        // attacker directly north: east, west, and south all reach distance 2
        assert_eq!(
            flee_directions(Position::new(5, 6), Position::new(5, 5)),
            vec![Direction::East, Direction::West, Direction::South]
        );
        assert_eq!(
            flee_directions(Position::new(5, 5), Position::new(3, 3)),
            vec![Direction::East, Direction::South]
        );
    }

    #[test]
    fn chaser_steps_towards_target() {
        let mut h = Harness::new(1);
        h.set_level(20, 20, SimLevel::Full);
        let prey = h.creature(28, 22, AiState::default());
        let hunter = h.creature(20, 20, AiState::targeting(AiMode::Chase, prey));

        step(&mut h.ctx(), hunter, Position::new(20, 20)).unwrap();
        assert_eq!(h.position(hunter), Position::new(21, 20));
        assert!(matches!(
            h.events.events()[0].kind,
            SimEventKind::Moved { entity, .. } if entity == hunter
        ));
    }

    #[test]
    fn chaser_falls_back_to_secondary_axis() {
        let mut h = Harness::new(1);
        let prey = h.creature(28, 22, AiState::default());
        let hunter = h.creature(20, 20, AiState::targeting(AiMode::Chase, prey));
        h.world.chunks.set_terrain_at(21, 20, TerrainKind::Rock);

        step(&mut h.ctx(), hunter, Position::new(20, 20)).unwrap();
        assert_eq!(h.position(hunter), Position::new(20, 21));
    }

    #[test]
    fn defender_flees_east_from_attacker_to_the_north() {
        let mut h = Harness::new(1);
        let attacker = h.creature(5, 5, AiState::default());
        let defender = h.creature(5, 6, AiState::targeting(AiMode::Flee, attacker));

        step(&mut h.ctx(), defender, Position::new(5, 6)).unwrap();
        assert_eq!(h.position(defender), Position::new(6, 6));
    }

    #[test]
    fn flee_skips_blocked_candidates() {
        let mut h = Harness::new(1);
        let attacker = h.creature(5, 5, AiState::default());
        let defender = h.creature(5, 6, AiState::targeting(AiMode::Flee, attacker));
        h.world.chunks.set_terrain_at(6, 6, TerrainKind::Wall);

        step(&mut h.ctx(), defender, Position::new(5, 6)).unwrap();
        assert_eq!(h.position(defender), Position::new(4, 6));
    }

    #[test]
    fn engaged_creatures_hold_still() {
        let mut h = Harness::new(1);
        let foe = h.creature(10, 11, AiState::default());
        let fighter = h.creature(10, 10, AiState::targeting(AiMode::Engaged, foe));
        for _ in 0..10 {
            step(&mut h.ctx(), fighter, Position::new(10, 10)).unwrap();
        }
        assert_eq!(h.position(fighter), Position::new(10, 10));
        assert!(h.events.is_empty());
    }

    #[test]
    fn missing_target_wanders() {
        let mut h = Harness::new(1);
        let gone = h.world.entities.spawn(wd_core::EntityKind::Creature, "unplaced");
        let seeker = h.creature(30, 30, AiState::targeting(AiMode::Chase, gone));
        step(&mut h.ctx(), seeker, Position::new(30, 30)).unwrap();
        assert_eq!(h.position(seeker).manhattan(Position::new(30, 30)), 1);
        assert_eq!(h.events.len(), 1);
    }

    #[test]
    fn cornered_chaser_still_emits_an_outcome() {
        let mut h = Harness::new(9);
        let prey = h.creature(12, 10, AiState::default());
        let hunter = h.creature(10, 10, AiState::targeting(AiMode::Chase, prey));
        for (x, y) in [(11, 10), (9, 10), (10, 11), (10, 9)] {
            h.world.chunks.set_terrain_at(x, y, TerrainKind::Wall);
        }
        step(&mut h.ctx(), hunter, Position::new(10, 10)).unwrap();
        assert_eq!(h.position(hunter), Position::new(10, 10));
        assert!(matches!(
            h.events.events()[0].kind,
            SimEventKind::MoveBlocked { .. }
        ));
    }
}
