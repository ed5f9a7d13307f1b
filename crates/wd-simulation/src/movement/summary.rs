use wd_core::{EntityId, Position};

use super::{attempt_step, random_direction};
use crate::context::SimContext;
use crate::error::SimResult;

/// Rare random step for an off-screen creature. Emits nothing.
pub(super) fn step(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    from: Position,
    idle_chance: f64,
) -> SimResult<()> {
    if ctx.roll(idle_chance) {
        return Ok(());
    }
    let dir = random_direction(ctx.rng);
    attempt_step(ctx, id, from, dir, false)?;
    Ok(())
}
