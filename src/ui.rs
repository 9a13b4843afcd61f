use crate::constants::{glyph, ui as ui_const};
use crate::error::Result;
use crate::models::{BlockKind, Grid};
use crate::render::Renderer;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    prelude::*,
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};
use std::io::Stdout;

// -- Terminal session ---------------------------------------------------------

/// Puts the terminal back into cooked mode on the main screen. Safe to call
/// more than once, and from the signal and key listeners.
pub fn restore_terminal() {
    use crossterm::{
        cursor::Show,
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };

    let _ = execute!(std::io::stdout(), LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

/// Terminal size in (columns, rows), with a fallback when it cannot be queried.
pub fn terminal_size() -> (u16, u16) {
    crossterm::terminal::size().unwrap_or((ui_const::FALLBACK_WIDTH, ui_const::FALLBACK_HEIGHT))
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Blocks until `q` or Ctrl-C is pressed.
pub fn poll_quit_event() -> std::io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if is_quit_key(&key) {
                return Ok(());
            }
        }
    }
}

// -- Renderer -----------------------------------------------------------------

type Cell = (char, Style);

#[derive(Debug, Default)]
struct PendingFrame {
    status: String,
    legend: bool,
    width: usize,
    cells: Vec<Cell>,
}

pub struct TerminalRenderer<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    pending: PendingFrame,
}

impl TerminalRenderer {
    /// Enters the alternate screen in raw mode.
    pub fn new() -> Result<Self> {
        use crossterm::{
            cursor::Hide,
            terminal::{enable_raw_mode, EnterAlternateScreen},
            ExecutableCommand,
        };

        std::io::stdout().execute(EnterAlternateScreen)?.execute(Hide)?;
        enable_raw_mode()?;
        Self::with_backend(CrosstermBackend::new(std::io::stdout()))
    }

    pub fn cleanup(&mut self) -> Result<()> {
        use crossterm::{
            cursor::Show,
            terminal::{disable_raw_mode, LeaveAlternateScreen},
            ExecutableCommand,
        };

        self.terminal.clear()?;
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)?
            .execute(Show)?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn with_backend(backend: B) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            pending: PendingFrame::default(),
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn clear(&mut self) -> Result<()> {
        self.pending.status.clear();
        self.pending.legend = false;
        self.pending.cells.clear();
        Ok(())
    }

    fn draw_status_bar(&mut self, text: &str) -> Result<()> {
        self.pending.status.clear();
        self.pending.status.push_str(text);
        Ok(())
    }

    fn draw_legend_bar(&mut self) -> Result<()> {
        self.pending.legend = true;
        Ok(())
    }

    fn draw_blocks(
        &mut self,
        grid: &Grid,
        highlight: Option<usize>,
        active_write: Option<usize>,
    ) -> Result<()> {
        self.pending.width = grid.width();
        self.pending.cells.clear();
        self.pending.cells.extend(
            grid.blocks()
                .iter()
                .enumerate()
                .map(|(i, block)| cell_appearance(block.kind, i, highlight, active_write)),
        );
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let pending = &self.pending;
        self.terminal.draw(|frame| render_frame(pending, frame))?;
        Ok(())
    }
}

/// Glyph and style of one block. Blocks up to `highlight` are drawn as
/// processed: Bad and Unmovable keep their glyph, the write cursor shows `W`,
/// everything else shows as Full.
pub fn cell_appearance(
    kind: BlockKind,
    index: usize,
    highlight: Option<usize>,
    active_write: Option<usize>,
) -> (char, Style) {
    if highlight.is_some_and(|h| index <= h) {
        let shown = if active_write == Some(index) {
            BlockKind::Writing
        } else if !kind.is_movable() {
            kind
        } else {
            BlockKind::Full
        };
        return (shown.glyph(), Style::new().fg(Color::Yellow));
    }

    let fg = match kind {
        BlockKind::Full => Color::White,
        BlockKind::Fragmented | BlockKind::Bad => Color::Red,
        BlockKind::Unmovable => Color::Magenta,
        BlockKind::Writing => Color::Green,
        BlockKind::Reading => Color::Cyan,
        BlockKind::Empty => Color::Black,
    };
    (kind.glyph(), Style::new().fg(fg))
}

fn render_frame(pending: &PendingFrame, frame: &mut Frame) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let bar = Style::new().fg(Color::White).bg(Color::Blue);

    frame.render_widget(Paragraph::new(pending.status.as_str()).style(bar), layout[0]);
    frame.render_widget(
        BlockGridWidget {
            cells: &pending.cells,
            width: pending.width,
        },
        layout[1],
    );
    if pending.legend {
        frame.render_widget(Paragraph::new(glyph::LEGEND).style(bar), layout[2]);
    }
}

// -- Block grid widget --------------------------------------------------------

struct BlockGridWidget<'a> {
    cells: &'a [Cell],
    width: usize,
}

impl Widget for BlockGridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.width == 0 {
            return;
        }

        for (y, row) in self.cells.chunks(self.width).enumerate() {
            let row_y = y as u16;
            if row_y >= area.height {
                break;
            }
            for (x, &(symbol, style)) in row.iter().enumerate() {
                let col = x as u16;
                if col >= area.width {
                    break;
                }
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row_y)) {
                    cell.set_char(symbol).set_style(style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::engine::Simulation;
    use crate::models::BlockKind::*;
    use rand::{rngs::StdRng, SeedableRng};
    use ratatui::backend::TestBackend;

    fn symbol_at(renderer: &TerminalRenderer<TestBackend>, x: u16, y: u16) -> String {
        renderer
            .backend()
            .buffer()
            .cell((x, y))
            .map(|c| c.symbol().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_unprocessed_cells_use_kind_colors() {
        assert_eq!(cell_appearance(Full, 3, None, None), ('█', Style::new().fg(Color::White)));
        assert_eq!(cell_appearance(Fragmented, 3, None, None).1.fg, Some(Color::Red));
        assert_eq!(cell_appearance(Unmovable, 3, Some(1), None).1.fg, Some(Color::Magenta));
        assert_eq!(cell_appearance(Reading, 0, None, None).0, 'r');
    }

    #[test]
    fn test_processed_cells() {
        let yellow = Some(Color::Yellow);
        assert_eq!(cell_appearance(Empty, 1, Some(4), None), ('█', Style::new().fg(Color::Yellow)));
        assert_eq!(cell_appearance(Bad, 2, Some(4), Some(3)).0, 'B');
        assert_eq!(cell_appearance(Unmovable, 4, Some(4), None).0, 'X');
        assert_eq!(cell_appearance(Full, 3, Some(4), Some(3)).0, 'W');
        assert_eq!(cell_appearance(Full, 3, Some(4), Some(3)).1.fg, yellow);
    }

    #[test]
    fn test_frame_layout() {
        let mut renderer = TerminalRenderer::with_backend(TestBackend::new(12, 5)).unwrap();
        let grid = Grid::from_kinds(4, [Full, Empty, Fragmented, Bad, Unmovable, Empty]);

        renderer.clear().unwrap();
        renderer.draw_status_bar("Scanning").unwrap();
        renderer.draw_blocks(&grid, None, None).unwrap();
        renderer.draw_legend_bar().unwrap();
        renderer.show().unwrap();

        assert_eq!(symbol_at(&renderer, 0, 0), "S");
        assert_eq!(symbol_at(&renderer, 0, 1), "█");
        assert_eq!(symbol_at(&renderer, 2, 1), "▒");
        assert_eq!(symbol_at(&renderer, 3, 1), "B");
        assert_eq!(symbol_at(&renderer, 0, 2), "X");
        assert_eq!(symbol_at(&renderer, 0, 4), "L");
    }

    #[test]
    fn test_engine_drives_terminal_renderer() {
        let renderer = TerminalRenderer::with_backend(TestBackend::new(10, 4)).unwrap();
        let mut sim = Simulation::new(SimConfig::headless(10, 2), renderer, StdRng::seed_from_u64(8)).unwrap();
        sim.run().unwrap();

        let status: String = (0..8).map(|x| symbol_at(sim.renderer(), x, 0)).collect();
        assert_eq!(status, "Defragme");
    }

    #[test]
    fn test_quit_keys() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(is_quit_key(&q));
        assert!(is_quit_key(&ctrl_c));
        assert!(!is_quit_key(&c));
        assert!(!is_quit_key(&esc));
    }
}
