//! Drawing surface consumed by the simulation engine.
//!
//! A frame is `clear`, then the draw calls, then `show`. Implementations only
//! borrow the grid for the duration of a call.

use crate::error::Result;
use crate::models::Grid;

pub trait Renderer {
    fn clear(&mut self) -> Result<()>;

    fn draw_status_bar(&mut self, text: &str) -> Result<()>;

    fn draw_legend_bar(&mut self) -> Result<()>;

    /// Cells up to and including `highlight` are drawn as already processed;
    /// `active_write` is drawn as being written.
    fn draw_blocks(
        &mut self,
        grid: &Grid,
        highlight: Option<usize>,
        active_write: Option<usize>,
    ) -> Result<()>;

    fn show(&mut self) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn draw_status_bar(&mut self, text: &str) -> Result<()> {
        (**self).draw_status_bar(text)
    }

    fn draw_legend_bar(&mut self) -> Result<()> {
        (**self).draw_legend_bar()
    }

    fn draw_blocks(
        &mut self,
        grid: &Grid,
        highlight: Option<usize>,
        active_write: Option<usize>,
    ) -> Result<()> {
        (**self).draw_blocks(grid, highlight, active_write)
    }

    fn show(&mut self) -> Result<()> {
        (**self).show()
    }
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) -> Result<()> {
        Ok(())
    }

    fn draw_status_bar(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn draw_legend_bar(&mut self) -> Result<()> {
        Ok(())
    }

    fn draw_blocks(
        &mut self,
        _grid: &Grid,
        _highlight: Option<usize>,
        _active_write: Option<usize>,
    ) -> Result<()> {
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use crate::models::BlockKind;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Clear,
        Status(String),
        Legend,
        Blocks {
            kinds: Vec<BlockKind>,
            highlight: Option<usize>,
            active_write: Option<usize>,
        },
        Show,
    }

    /// Keeps every call, with a snapshot of the grid for block draws.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub calls: Vec<Call>,
    }

    impl RecordingRenderer {
        pub fn frames(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::Show).count()
        }

        pub fn statuses(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Status(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn block_snapshots(&self) -> Vec<&[BlockKind]> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Blocks { kinds, .. } => Some(kinds.as_slice()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Renderer for RecordingRenderer {
        fn clear(&mut self) -> Result<()> {
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn draw_status_bar(&mut self, text: &str) -> Result<()> {
            self.calls.push(Call::Status(text.to_string()));
            Ok(())
        }

        fn draw_legend_bar(&mut self) -> Result<()> {
            self.calls.push(Call::Legend);
            Ok(())
        }

        fn draw_blocks(
            &mut self,
            grid: &Grid,
            highlight: Option<usize>,
            active_write: Option<usize>,
        ) -> Result<()> {
            self.calls.push(Call::Blocks {
                kinds: grid.kinds(),
                highlight,
                active_write,
            });
            Ok(())
        }

        fn show(&mut self) -> Result<()> {
            self.calls.push(Call::Show);
            Ok(())
        }
    }
}
