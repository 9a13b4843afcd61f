use anyhow::Result;
use clap::Parser;
use scandisk_sim::{app, ui};

fn main() -> Result<()> {
    let args = app::Args::parse();

    if let Err(e) = app::run(args) {
        // Terminal may still be in raw mode if setup failed halfway
        ui::restore_terminal();
        return Err(e.into());
    }
    Ok(())
}
