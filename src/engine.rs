//! Scan, defragment and compact phases over a block grid.
//!
//! Every mutation is followed by a rendered frame. The engine owns the grid
//! for the whole run and only lends it to the renderer while drawing.

use crate::config::{ChunkBounds, SimConfig};
use crate::constants::{chunk, scan};
use crate::error::Result;
use crate::generator;
use crate::models::{BlockKind, DefragPhase, Grid, RunStats};
use crate::render::Renderer;
use rand::Rng;
use std::{thread, time::Duration};
use tracing::{debug, info, trace};

/// Up to a random `bounds`-sized run of indices holding `kind`, in index order.
///
/// Bad and Unmovable blocks are never selected.
pub fn find_next_chunk<G: Rng + ?Sized>(
    grid: &Grid,
    kind: BlockKind,
    bounds: ChunkBounds,
    rng: &mut G,
) -> Vec<usize> {
    let size = bounds.pick(rng);
    if !kind.is_movable() {
        return Vec::new();
    }
    grid.blocks()
        .iter()
        .enumerate()
        .filter(|(_, block)| block.kind == kind)
        .map(|(i, _)| i)
        .take(size)
        .collect()
}

pub fn find_first_empty(grid: &Grid) -> Option<usize> {
    grid.first_of(BlockKind::Empty)
}

pub struct Simulation<R, G> {
    config: SimConfig,
    renderer: R,
    rng: G,
    grid: Grid,
    phase: DefragPhase,
    stats: RunStats,
}

impl<R: Renderer, G: Rng> Simulation<R, G> {
    pub fn new(config: SimConfig, renderer: R, rng: G) -> Result<Self> {
        config.validate()?;
        let grid = Grid::filled(config.width, config.height, BlockKind::Empty);
        Ok(Self::with_grid(config, renderer, rng, grid))
    }

    /// Starts from an existing grid instead of a generated one. The grid's own
    /// dimensions win over the configured ones.
    pub fn with_grid(config: SimConfig, renderer: R, rng: G, grid: Grid) -> Self {
        Self {
            config,
            renderer,
            rng,
            grid,
            phase: DefragPhase::Initializing,
            stats: RunStats::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> DefragPhase {
        self.phase
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Generates a fresh grid and runs every phase on it.
    pub fn run(&mut self) -> Result<RunStats> {
        let grid = generator::generate(self.config.width, self.config.height, &mut self.rng);
        self.run_on(grid)
    }

    pub fn run_on(&mut self, grid: Grid) -> Result<RunStats> {
        self.grid = grid;
        self.stats = RunStats::default();
        self.enter(DefragPhase::Initializing);
        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            fragmented = self.grid.count(BlockKind::Fragmented),
            full = self.grid.count(BlockKind::Full),
            "starting run"
        );
        self.frame("Initializing...", None, None, Duration::ZERO)?;

        if !self.config.skip_scan {
            self.scan()?;
        }
        self.defrag_until_stalled()?;
        self.compact()?;

        self.enter(DefragPhase::Finished);
        self.frame("Defragmentation complete", None, None, self.config.base_delay)?;
        info!(stats = ?self.stats, "run finished");
        Ok(self.stats)
    }

    /// One pass over every block. Some fragments turn out to be reclaimable
    /// and are cleared to Empty on the way.
    pub fn scan(&mut self) -> Result<()> {
        self.enter(DefragPhase::Scanning);
        let total = self.grid.len();

        for i in 0..total {
            self.stats.blocks_scanned += 1;

            if self.grid.kind(i) == BlockKind::Fragmented
                && self.rng.gen_range(0..scan::RECLAIM_ROLL) < scan::RECLAIM_CHANCE
            {
                self.grid.set_kind(i, BlockKind::Reading);
                let status = format!("Reading block {}/{}", i + 1, total);
                self.frame(&status, Some(i), Some(i), self.config.scan_read_delay())?;
                self.grid.set_kind(i, BlockKind::Empty);
                self.stats.fragments_reclaimed += 1;
                trace!(index = i, "reclaimed fragment");
            }

            let status = format!("Scanning block {}/{}", i + 1, total);
            self.frame(&status, Some(i), Some(i), self.config.scan_delay())?;
        }

        debug!(
            scanned = total,
            reclaimed = self.stats.fragments_reclaimed,
            "scan done"
        );
        Ok(())
    }

    /// Moves one chunk of `target` blocks into the lowest empty slots.
    ///
    /// Returns false when there is nothing of `target` left or no empty slot
    /// to write to. A chunk may be only partly moved if the grid runs out of
    /// empty slots.
    pub fn defrag(&mut self, target: BlockKind, bounds: ChunkBounds) -> Result<bool> {
        self.enter(DefragPhase::Defragmenting);

        let chunk = find_next_chunk(&self.grid, target, bounds, &mut self.rng);
        if chunk.is_empty() {
            debug!(?target, "no blocks left to move");
            return Ok(false);
        }
        let Some(mut dest) = find_first_empty(&self.grid) else {
            debug!(?target, "no empty slot left");
            return Ok(false);
        };

        let moving = format!("Moving {} fragmented blocks...", chunk.len());
        let delay = self.config.base_delay;
        let mut moved = 0;

        for &src in &chunk {
            self.grid.set_kind(src, BlockKind::Reading);
            self.frame("Reading fragmented block...", None, None, delay)?;

            self.grid.set_kind(src, BlockKind::Empty);
            self.grid.set_kind(dest, BlockKind::Full);
            moved += 1;
            trace!(from = src, to = dest, "relocated block");
            self.frame(&moving, None, None, delay)?;

            match self.grid.next_of(BlockKind::Empty, dest + 1) {
                Some(next) => dest = next,
                None => break,
            }
        }

        self.stats.defrag_rounds += 1;
        self.stats.blocks_relocated += moved;
        debug!(?target, chunk = chunk.len(), moved, "defrag round");
        Ok(true)
    }

    /// Runs groups of one fragmented round and four full rounds until any
    /// round stalls.
    pub fn defrag_until_stalled(&mut self) -> Result<()> {
        self.enter(DefragPhase::Defragmenting);
        let fragmented = self.config.fragmented_chunk;
        let full = self.config.full_chunk;

        'groups: loop {
            if !self.defrag(BlockKind::Fragmented, fragmented)? {
                break;
            }
            for _ in 0..chunk::FULL_ROUNDS_PER_GROUP {
                if !self.defrag(BlockKind::Full, full)? {
                    break 'groups;
                }
            }
        }
        Ok(())
    }

    /// Single forward pass moving each Full block into the first empty slot
    /// before it. Returns the number of moves.
    pub fn compact(&mut self) -> Result<usize> {
        self.enter(DefragPhase::Compacting);
        let delay = self.config.base_delay;
        let mut moves = 0;

        for i in 0..self.grid.len() {
            if self.grid.kind(i) != BlockKind::Full {
                continue;
            }
            let Some(dest) = find_first_empty(&self.grid) else {
                break;
            };
            if dest > i {
                // still inside the packed prefix
                continue;
            }

            self.grid.set_kind(dest, BlockKind::Writing);
            self.frame("Compacting full blocks...", Some(i), Some(dest), delay)?;
            self.grid.set_kind(dest, BlockKind::Full);
            self.grid.set_kind(i, BlockKind::Empty);
            moves += 1;
            trace!(from = i, to = dest, "compacted block");
        }

        self.stats.blocks_compacted += moves;
        debug!(moves, "compaction done");
        Ok(moves)
    }

    fn enter(&mut self, phase: DefragPhase) {
        if self.phase != phase {
            info!(from = self.phase.name(), to = phase.name(), "phase change");
            self.phase = phase;
        }
    }

    fn frame(
        &mut self,
        status: &str,
        highlight: Option<usize>,
        active_write: Option<usize>,
        delay: Duration,
    ) -> Result<()> {
        self.renderer.clear()?;
        self.renderer.draw_status_bar(status)?;
        self.renderer
            .draw_blocks(&self.grid, highlight, active_write)?;
        self.renderer.draw_legend_bar()?;
        self.renderer.show()?;
        self.stats.frames_rendered += 1;

        if !delay.is_zero() {
            thread::sleep(delay);
        }
        Ok(())
    }
}
