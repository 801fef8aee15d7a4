use std::path::PathBuf;

use clap::{Parser, Subcommand};
use minesweeper_core::{CellCount, Coord, Format};
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper played one move at a time against a save file", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Settings file, defaults to ./minesweeper.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save file to play on
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Save format (text, binary, json), guessed from the save file extension otherwise
    #[arg(short, long)]
    format: Option<Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new game with a random layout
    New {
        #[arg(long)]
        rows: Option<Coord>,
        #[arg(long)]
        columns: Option<Coord>,
        #[arg(long)]
        mines: Option<CellCount>,
        /// Force a seed instead of random
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Start a new game from a layout description file
    Layout { file: PathBuf },
    /// Reveal a tile
    Reveal { row: Coord, col: Coord },
    /// Cycle a tile through flag, question mark and covered
    Flag { row: Coord, col: Coord },
    /// Reveal the neighbors of a number whose flags are all placed
    Chord { row: Coord, col: Coord },
    /// Lay new mines with the saved board's size
    Restart {
        /// Force a seed instead of random
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show board size, mines left and game status
    Status,
    /// Print every tile, mines included
    Dump,
    /// Write the save in another format
    Convert {
        output: PathBuf,
        /// Target format, guessed from the output extension otherwise
        #[arg(long)]
        to: Option<Format>,
    },
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(save) = args.save {
        settings.save_path = save;
    }
    if let Some(format) = args.format {
        settings.format = Some(format);
    }
    log::debug!("save: {} ({})", settings.save_path.display(), settings.format());

    commands::run(args.command, &settings)
}
