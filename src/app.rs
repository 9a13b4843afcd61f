use crate::config::{ChunkBounds, SimConfig};
use crate::constants::{chunk, timing, ui as ui_const};
use crate::engine::Simulation;
use crate::error::Result;
use crate::logging;
use crate::render::Renderer;
use crate::ui::{self, TerminalRenderer};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{path::PathBuf, thread, time::Duration};
use tracing::{info, warn};

// -- CLI arguments ------------------------------------------------------------

#[derive(clap::Parser, Debug)]
#[command(
    name = "scandisk",
    version,
    about = "Disk defragmenter simulation",
    disable_help_flag = true
)]
pub struct Args {
    /// Grid width (defaults to the terminal width)
    #[arg(long, short = 'w')]
    pub width: Option<usize>,

    /// Grid height (defaults to the terminal height minus the status and legend bars)
    #[arg(long, short = 'h')]
    pub height: Option<usize>,

    /// Base frame delay in milliseconds
    #[arg(long, short = 'd', default_value_t = timing::DEFAULT_DELAY_MS)]
    pub delay: u64,

    /// Run in an infinite loop
    #[arg(long = "loop", short = 'l', default_value_t = false)]
    pub loop_forever: bool,

    /// Skip the scanning step
    #[arg(long, default_value_t = false)]
    pub skip_scan: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chunk size bounds for fragmented blocks, as MIN-MAX
    #[arg(long, default_value_t = chunk::FRAGMENTED)]
    pub frag_chunk: ChunkBounds,

    /// Chunk size bounds for full blocks, as MIN-MAX
    #[arg(long, default_value_t = chunk::FULL)]
    pub full_chunk: ChunkBounds,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl Args {
    /// Resolves the grid size against the terminal size given as (columns, rows).
    /// A missing or zero dimension falls back to the terminal.
    pub fn to_config(&self, terminal: (u16, u16)) -> SimConfig {
        let (cols, rows) = terminal;
        let width = self
            .width
            .filter(|&w| w > 0)
            .unwrap_or(cols as usize);
        let height = self
            .height
            .filter(|&h| h > 0)
            .unwrap_or(rows.saturating_sub(ui_const::CHROME_ROWS) as usize);

        SimConfig {
            width,
            height,
            base_delay: Duration::from_millis(self.delay),
            skip_scan: self.skip_scan,
            loop_forever: self.loop_forever,
            fragmented_chunk: self.frag_chunk,
            full_chunk: self.full_chunk,
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

// -- Application --------------------------------------------------------------

/// Runs the simulation in the terminal until it finishes or the user quits.
pub fn run(args: Args) -> Result<()> {
    if let Some(path) = &args.log_file {
        logging::init_file_logging(path)?;
    }

    let config = args.to_config(ui::terminal_size());
    config.validate()?;
    info!(?config, seed = ?args.seed, "configuration");

    install_quit_listeners()?;

    let mut renderer = TerminalRenderer::new()?;
    let result = drive(config, &mut renderer, args.rng());
    let restored = renderer.cleanup();
    result?;
    restored
}

/// Runs one simulation, or keeps starting new ones when looping.
pub fn drive<R: Renderer, G: Rng>(config: SimConfig, renderer: R, rng: G) -> Result<()> {
    let mut sim = Simulation::new(config, renderer, rng)?;
    let mut runs = 0usize;
    loop {
        let stats = sim.run()?;
        runs += 1;
        info!(run = runs, ?stats, "simulation complete");
        if !sim.config().loop_forever {
            return Ok(());
        }
    }
}

/// Signals and the quit key end the process straight away, after putting the
/// terminal back.
fn install_quit_listeners() -> Result<()> {
    ctrlc::set_handler(|| {
        info!("termination signal received");
        ui::restore_terminal();
        std::process::exit(0);
    })?;

    thread::spawn(|| match ui::poll_quit_event() {
        Ok(()) => {
            info!("quit key pressed");
            ui::restore_terminal();
            std::process::exit(0);
        }
        Err(e) => warn!(error = %e, "key listener stopped"),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullRenderer;
    use clap::{CommandFactory, Parser};

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults_follow_terminal_size() {
        let args = Args::try_parse_from(["scandisk"]).unwrap();
        let config = args.to_config((120, 40));
        assert_eq!(config.width, 120);
        assert_eq!(config.height, 38);
        assert_eq!(config.base_delay, Duration::from_millis(100));
        assert!(!config.skip_scan);
        assert!(!config.loop_forever);
        assert_eq!(config.fragmented_chunk, chunk::FRAGMENTED);
        assert_eq!(config.full_chunk, chunk::FULL);
    }

    #[test]
    fn test_explicit_flags() {
        let args = Args::try_parse_from([
            "scandisk",
            "-w",
            "30",
            "-h",
            "7",
            "-d",
            "5",
            "-l",
            "--skip-scan",
            "--seed",
            "99",
            "--frag-chunk",
            "1-2",
            "--full-chunk",
            "10-20",
        ])
        .unwrap();
        let config = args.to_config((120, 40));
        assert_eq!((config.width, config.height), (30, 7));
        assert_eq!(config.base_delay, Duration::from_millis(5));
        assert!(config.skip_scan);
        assert!(config.loop_forever);
        assert_eq!(config.fragmented_chunk, ChunkBounds { min: 1, max: 2 });
        assert_eq!(config.full_chunk, ChunkBounds { min: 10, max: 20 });
        assert_eq!(args.seed, Some(99));
    }

    #[test]
    fn test_zero_size_falls_back_to_terminal() {
        let args = Args::try_parse_from(["scandisk", "--width", "0", "--height", "0"]).unwrap();
        let config = args.to_config((50, 20));
        assert_eq!((config.width, config.height), (50, 18));
    }

    #[test]
    fn test_tiny_terminal_fails_validation() {
        let args = Args::try_parse_from(["scandisk"]).unwrap();
        assert!(args.to_config((40, 2)).validate().is_err());
    }

    #[test]
    fn test_bad_chunk_flag_is_rejected() {
        assert!(Args::try_parse_from(["scandisk", "--frag-chunk", "9-3"]).is_err());
        assert!(Args::try_parse_from(["scandisk", "--full-chunk", "lots"]).is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let args = Args::try_parse_from(["scandisk", "--seed", "5"]).unwrap();
        let a: u64 = args.rng().gen();
        let b: u64 = args.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_drive_single_run() {
        let config = SimConfig::headless(16, 4);
        assert!(drive(config, NullRenderer, StdRng::seed_from_u64(1)).is_ok());
    }
}
