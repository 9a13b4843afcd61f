//! Constants for the scandisk simulator
//!
//! Probability bands, chunk bounds, glyphs and timing shared by the generator,
//! the engine and the terminal layer.

/// Block generation probabilities
pub mod generation {
    /// Rolls are drawn uniformly from `0..ROLL_RANGE`
    pub const ROLL_RANGE: u32 = 100;

    /// Rolls below this are Empty
    pub const EMPTY_BELOW: u32 = 70;

    /// Rolls below this (and at or above EMPTY_BELOW) are Full
    pub const FULL_BELOW: u32 = 90;

    /// Rolls below this are Fragmented
    pub const FRAGMENTED_BELOW: u32 = 98;

    /// Rolls below this are Bad. The remaining band is Empty again.
    pub const BAD_BELOW: u32 = 99;

    /// One block in this many becomes Unmovable in the second pass
    pub const UNMOVABLE_ONE_IN: u32 = 500;
}

/// Chunk size bounds for the defragmentation rounds
pub mod chunk {
    use crate::config::ChunkBounds;

    /// Fragmented blocks move in small chunks
    pub const FRAGMENTED: ChunkBounds = ChunkBounds { min: 3, max: 15 };

    /// Full blocks move in large chunks
    pub const FULL: ChunkBounds = ChunkBounds { min: 100, max: 400 };

    /// Full-block rounds that follow each fragmented round
    pub const FULL_ROUNDS_PER_GROUP: usize = 4;
}

/// Scan phase probabilities
pub mod scan {
    /// A fragmented block is reclaimed when a roll in `0..RECLAIM_ROLL` is below this
    pub const RECLAIM_CHANCE: u32 = 2;

    pub const RECLAIM_ROLL: u32 = 10;
}

/// Block glyphs, shared by the legend and the grid
pub mod glyph {
    pub const EMPTY: char = '░';
    pub const FULL: char = '█';
    pub const FRAGMENTED: char = '▒';
    pub const BAD: char = 'B';
    pub const WRITING: char = 'W';
    pub const READING: char = 'r';
    pub const UNMOVABLE: char = 'X';

    pub const LEGEND: &str =
        "Legend: ░=Empty, █=Full, ▒=Fragmented, B=Bad, W=Writing, r=Reading, X=Unmovable";
}

/// Animation timing constants
pub mod timing {
    /// Default base frame delay in milliseconds
    pub const DEFAULT_DELAY_MS: u64 = 100;
}

/// UI layout constants
pub mod ui {
    /// Rows taken by the status bar and the legend bar
    pub const CHROME_ROWS: u16 = 2;

    /// Grid size used when the terminal size cannot be queried
    pub const FALLBACK_WIDTH: u16 = 80;
    pub const FALLBACK_HEIGHT: u16 = 24;
}
