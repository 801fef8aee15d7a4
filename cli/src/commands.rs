use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use minesweeper_core::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Command;
use crate::settings::Settings;

pub fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let path = settings.save_path.as_path();
    let format = settings.format();

    match command {
        Command::New {
            rows,
            columns,
            mines,
            seed,
        } => {
            let settings = Settings {
                rows: rows.unwrap_or(settings.rows),
                columns: columns.unwrap_or(settings.columns),
                mines: mines.unwrap_or(settings.mines),
                seed: seed.or(settings.seed),
                ..settings.clone()
            };
            let board = Board::new_random(settings.board_config(), &mut rng(settings.seed));
            let game = GameSession::new(board);
            save(&game, path, format)?;
            print_status(&game);
        }
        Command::Layout { file } => {
            let description = fs::read_to_string(&file)
                .with_context(|| format!("could not read layout {}", file.display()))?;
            let game = GameSession::new(Board::from_layout(&description)?);
            save(&game, path, format)?;
            print_status(&game);
        }
        Command::Reveal { row, col } => {
            play(path, format, |game| game.reveal((row, col)).map(drop))?;
        }
        Command::Flag { row, col } => {
            play(path, format, |game| {
                let state = game.toggle_flag((row, col))?;
                println!("({row}, {col}) is now {state}");
                Ok(())
            })?;
        }
        Command::Chord { row, col } => {
            play(path, format, |game| {
                if !game.can_chord((row, col)) && !game.is_finished() {
                    println!("({row}, {col}) cannot be chorded");
                }
                game.chord((row, col)).map(drop)
            })?;
        }
        Command::Restart { seed } => {
            let mut game = load(path, format)?;
            game.restart(&mut rng(seed.or(settings.seed)));
            save(&game, path, format)?;
            print_status(&game);
        }
        Command::Status => {
            print_status(&load(path, format)?);
        }
        Command::Dump => {
            print!("{}", load(path, format)?.board());
        }
        Command::Convert { output, to } => {
            let game = load(path, format)?;
            let to = to
                .or_else(|| Format::from_extension(&output))
                .unwrap_or_default();
            save(&game, &output, to)?;
            println!("Saved to {} as {to}", output.display());
        }
    }
    Ok(())
}

fn rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);
    StdRng::seed_from_u64(seed)
}

/// Load, apply one move, save and report the outcome.
fn play(
    path: &Path,
    format: Format,
    action: impl FnOnce(&mut GameSession) -> Result<()>,
) -> anyhow::Result<()> {
    let mut game = load(path, format)?;
    match action(&mut game) {
        Ok(()) => {}
        Err(BoardError::AlreadyEnded) => {
            println!("Game is over, start a new one or restart");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }
    save(&game, path, format)?;
    print_status(&game);
    Ok(())
}

fn load(path: &Path, format: Format) -> anyhow::Result<GameSession> {
    let file = File::open(path).with_context(|| format!("Load failed: {}", path.display()))?;
    let board = Board::read(&format, &mut BufReader::new(file))
        .with_context(|| format!("Load failed: {}", path.display()))?;
    Ok(GameSession::new(board))
}

/// Writes to a staging file next to `path`, then renames it over `path`.
fn save(game: &GameSession, path: &Path, format: Format) -> anyhow::Result<()> {
    let staged = staging_path(path);
    let written = write_save(game, &staged, format).and_then(|()| Ok(fs::rename(&staged, path)?));
    if written.is_err() {
        fs::remove_file(&staged).ok();
    }
    written.with_context(|| format!("Save failed: {}", path.display()))?;
    log::info!("saved to {}", path.display());
    Ok(())
}

fn write_save(game: &GameSession, path: &Path, format: Format) -> anyhow::Result<()> {
    let mut sink = BufWriter::new(File::create(path)?);
    game.save(&format, &mut sink)?;
    sink.flush()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

fn status_line(game: &GameSession) -> String {
    let board = game.board();
    match game.status() {
        GameStatus::Won => "You win!".to_string(),
        GameStatus::Lost { exploded: (row, col) } => {
            format!("BOOM! You lost. Mine at ({row}, {col})")
        }
        GameStatus::Playing => format!(
            "Minesweeper {}x{} ({} mines), {} left to flag",
            board.rows(),
            board.columns(),
            board.mines(),
            game.mines_left()
        ),
    }
}

fn print_status(game: &GameSession) {
    println!("{}", status_line(game));
}
