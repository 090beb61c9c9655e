use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::Parser;
use mine3d_core::{CellCount, Coord, Difficulty, GameConfig};

use command::Command;
use controller::{Controller, Flow, Setup};
use records::RecordStore;

mod command;
mod controller;
mod records;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in a cube", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Preset board: easy, normal, hard or expert
    #[arg(short, long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Custom board size as X,Y,Z instead of a preset
    #[arg(long, value_delimiter = ',', requires = "mines")]
    size: Option<Vec<Coord>>,

    /// Mine count for a custom board
    #[arg(long, requires = "size")]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Name stored with record times
    #[arg(short, long, default_value = "anonymous")]
    player: String,

    /// JSON file keeping the best times
    #[arg(short, long)]
    records: Option<PathBuf>,
}

impl Args {
    fn setup(&self) -> anyhow::Result<Setup> {
        let (Some(size), Some(mines)) = (&self.size, self.mines) else {
            return Ok(Setup::Preset(self.difficulty));
        };
        let &[x, y, z] = size.as_slice() else {
            bail!("--size takes exactly three values");
        };
        Ok(Setup::Custom(GameConfig::new((x, y, z), mines)?))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_micros() as u64);
    log::debug!("seed: {seed}");

    let setup = args.setup()?;
    let records = RecordStore::open(args.records.clone())?;
    let mut controller = Controller::new(setup, seed, args.player.clone(), records)?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", command::HELP)?;
    controller.show(&mut out)?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if controller.handle(command, Utc::now(), &mut out)? == Flow::Quit {
                    break;
                }
            }
            Err(err) => writeln!(out, "{err:#}")?,
        }
        out.flush()?;
    }

    log::debug!("Leaving with the game {:?}", controller.session().status());
    Ok(())
}
