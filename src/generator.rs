//! Random disk surface generation.

use crate::constants::generation;
use crate::models::{BlockKind, Grid};
use rand::Rng;

/// Maps a roll in `0..ROLL_RANGE` to a block kind.
pub fn kind_for_roll(roll: u32) -> BlockKind {
    match roll {
        r if r < generation::EMPTY_BELOW => BlockKind::Empty,
        r if r < generation::FULL_BELOW => BlockKind::Full,
        r if r < generation::FRAGMENTED_BELOW => BlockKind::Fragmented,
        r if r < generation::BAD_BELOW => BlockKind::Bad,
        _ => BlockKind::Empty,
    }
}

/// Builds a `width * height` grid that looks like a used, fragmented disk.
///
/// Kinds are assigned first, then an independent pass marks roughly one block
/// in 500 as Unmovable, overwriting whatever it held.
pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Grid {
    let kinds: Vec<BlockKind> = (0..width * height)
        .map(|_| kind_for_roll(rng.gen_range(0..generation::ROLL_RANGE)))
        .collect();
    let mut grid = Grid::from_kinds(width, kinds);

    for i in 0..grid.len() {
        if rng.gen_range(0..generation::UNMOVABLE_ONE_IN) < 1 {
            grid.set_kind(i, BlockKind::Unmovable);
        }
    }

    grid
}
