use crate::constants::glyph;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum BlockKind {
    Empty,      // Free space
    Full,       // Contiguous data
    Fragmented, // Data waiting to be moved
    Bad,        // Bad sector
    Writing,    // Transient, one frame
    Reading,    // Transient, one frame
    Unmovable,  // System block, never relocated
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Empty,
        BlockKind::Full,
        BlockKind::Fragmented,
        BlockKind::Bad,
        BlockKind::Writing,
        BlockKind::Reading,
        BlockKind::Unmovable,
    ];

    pub fn glyph(self) -> char {
        match self {
            BlockKind::Empty => glyph::EMPTY,
            BlockKind::Full => glyph::FULL,
            BlockKind::Fragmented => glyph::FRAGMENTED,
            BlockKind::Bad => glyph::BAD,
            BlockKind::Writing => glyph::WRITING,
            BlockKind::Reading => glyph::READING,
            BlockKind::Unmovable => glyph::UNMOVABLE,
        }
    }

    /// Whether the defragmenter may pick this block as a source or destination.
    pub fn is_movable(self) -> bool {
        !matches!(self, BlockKind::Bad | BlockKind::Unmovable)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Block {
    x: usize,
    y: usize,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(index: usize, width: usize, kind: BlockKind) -> Self {
        Self {
            x: index % width,
            y: index / width,
            kind,
        }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }
}

/// Row-major block surface. Lives for a single simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    blocks: Vec<Block>,
}

impl Grid {
    /// Builds a grid from kinds laid out row-major. A trailing partial row
    /// still counts toward `height`.
    pub fn from_kinds(width: usize, kinds: impl IntoIterator<Item = BlockKind>) -> Self {
        let width = width.max(1);
        let blocks: Vec<Block> = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Block::new(i, width, kind))
            .collect();
        let height = blocks.len().div_ceil(width);
        Self {
            width,
            height,
            blocks,
        }
    }

    pub fn filled(width: usize, height: usize, kind: BlockKind) -> Self {
        Self::from_kinds(width, std::iter::repeat(kind).take(width * height))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn kind(&self, index: usize) -> BlockKind {
        self.blocks[index].kind
    }

    pub fn set_kind(&mut self, index: usize, kind: BlockKind) {
        self.blocks[index].kind = kind;
    }

    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(|b| b.kind).collect()
    }

    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.iter().filter(|b| b.kind == kind).count()
    }

    pub fn first_of(&self, kind: BlockKind) -> Option<usize> {
        self.blocks.iter().position(|b| b.kind == kind)
    }

    /// First index at or after `from` holding `kind`.
    pub fn next_of(&self, kind: BlockKind, from: usize) -> Option<usize> {
        self.blocks
            .get(from..)?
            .iter()
            .position(|b| b.kind == kind)
            .map(|offset| from + offset)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DefragPhase {
    Initializing,
    Scanning,
    Defragmenting,
    Compacting,
    Finished,
}

impl DefragPhase {
    pub fn name(self) -> &'static str {
        match self {
            DefragPhase::Initializing => "initializing",
            DefragPhase::Scanning => "scanning",
            DefragPhase::Defragmenting => "defragmenting",
            DefragPhase::Compacting => "compacting",
            DefragPhase::Finished => "finished",
        }
    }
}

/// Counters collected over one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub blocks_scanned: usize,
    pub fragments_reclaimed: usize,
    pub defrag_rounds: usize,
    pub blocks_relocated: usize,
    pub blocks_compacted: usize,
    pub frames_rendered: usize,
}
