use std::collections::HashSet;

use tracing::trace;

use crate::chunk::{ChunkCoord, SimLevel};
use crate::chunk_store::ChunkStore;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::system::System;
use crate::viewport::Viewport;

/// Reassign every cached chunk's level from the viewport.
///
/// The chunk under the viewport center becomes full, other chunks
/// overlapping the viewport become macro (generated if missing), and every
/// remaining cached chunk drops to summary. Returns the center chunk.
pub fn update_simulation_levels(chunks: &mut ChunkStore, viewport: &Viewport) -> ChunkCoord {
    let center = viewport.center();
    let center_chunk = chunks.world_to_chunk(center.x, center.y);
    let visible: HashSet<ChunkCoord> = chunks.visible_chunks(viewport).into_iter().collect();
    // the center tile is always on screen, but a zero-sized viewport has no visible range
    chunks.chunk_mut(center_chunk);

    for chunk in chunks.chunks_mut() {
        chunk.level = if chunk.coord == center_chunk {
            SimLevel::Full
        } else if visible.contains(&chunk.coord) {
            SimLevel::Macro
        } else {
            SimLevel::Summary
        };
    }
    trace!(center = %center_chunk, visible = visible.len(), "assigned chunk levels");
    center_chunk
}

/// Runs [`update_simulation_levels`] at the start of every tick.
#[derive(Debug, Default)]
pub struct LodSystem {
    center: Option<ChunkCoord>,
}

impl LodSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full-fidelity chunk chosen on the last tick.
    pub fn center_chunk(&self) -> Option<ChunkCoord> {
        self.center
    }
}

impl System for LodSystem {
    fn name(&self) -> &str {
        "lod"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let viewport = ctx.world.viewport;
        self.center = Some(update_simulation_levels(&mut ctx.world.chunks, &viewport));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
