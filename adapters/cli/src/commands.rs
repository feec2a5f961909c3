//! Line commands typed on stdin during an interactive session.
//!
//! Each line becomes one [`FrameInput`]:
//!
//! ```text
//! brush Z        select the brush (H, Z, S, # or . / human, zombie, safe, barricade, empty)
//! paint 3 4      paint row 3, column 4 with the active brush
//! erase 3 4      clear row 3, column 4
//! look 3 4       report what painting row 3, column 4 would do
//! start | pause  switch between running and setup
//! step           advance a single turn
//! reset          clear the grid
//! quit           end the session
//! ```

use std::{
    io::BufRead,
    sync::mpsc::{self, Receiver},
    thread,
};

use anyhow::{Context, Result as AnyResult};
use outbreak_core::{Cell, CellCoord, PlayMode};
use outbreak_rendering::FrameInput;
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a command line could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CommandError {
    /// The first word is not a known command.
    #[error("unknown command `{0}`")]
    Unknown(String),
    /// The brush name does not denote a cell state.
    #[error("unknown brush `{0}`")]
    UnknownBrush(String),
    /// The command expects different arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parses one command line. Blank lines yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<FrameInput>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let mut input = FrameInput::default();
    match verb.to_ascii_lowercase().as_str() {
        "brush" | "b" => {
            let [name] = args[..] else {
                return Err(CommandError::Usage("brush <H|Z|S|#|.>"));
            };
            input.brush = Some(parse_brush(name)?);
        }
        "paint" | "p" => input.paint = Some(parse_cell(&args, "paint <row> <column>")?),
        "erase" | "e" => input.erase = Some(parse_cell(&args, "erase <row> <column>")?),
        "look" | "l" => input.inspect = Some(parse_cell(&args, "look <row> <column>")?),
        "start" | "run" => input.play_mode = Some(PlayMode::Running),
        "pause" => input.play_mode = Some(PlayMode::Setup),
        "step" | "s" => input.step_turn = true,
        "reset" => input.reset = true,
        "quit" | "q" | "exit" => input.quit = true,
        other => return Err(CommandError::Unknown(other.to_owned())),
    }
    Ok(Some(input))
}

fn parse_brush(name: &str) -> Result<Cell, CommandError> {
    let mut chars = name.chars();
    if let (Some(label), None) = (chars.next(), chars.next()) {
        if let Some(cell) = Cell::from_label(label.to_ascii_uppercase()) {
            return Ok(cell);
        }
    }
    match name.to_ascii_lowercase().as_str() {
        "human" => Ok(Cell::Human),
        "zombie" => Ok(Cell::Zombie),
        "safe" => Ok(Cell::Safe),
        "barricade" | "wall" => Ok(Cell::Barricade),
        "empty" => Ok(Cell::Empty),
        _ => Err(CommandError::UnknownBrush(name.to_owned())),
    }
}

fn parse_cell(args: &[&str], usage: &'static str) -> Result<CellCoord, CommandError> {
    let [row, column] = args[..] else {
        return Err(CommandError::Usage(usage));
    };
    let row = row.parse().map_err(|_| CommandError::Usage(usage))?;
    let column = column.parse().map_err(|_| CommandError::Usage(usage))?;
    Ok(CellCoord::new(row, column))
}

/// Reads command lines from `source` on a background thread.
///
/// Unparseable lines are logged and skipped. The channel disconnects once
/// `source` reaches end of input.
pub(crate) fn spawn_reader<R>(source: R) -> AnyResult<Receiver<FrameInput>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let _handle = thread::Builder::new()
        .name("outbreak-commands".into())
        .spawn(move || {
            for line in source.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(error) => {
                        warn!(%error, "stopped reading commands");
                        break;
                    }
                };
                match parse_command(&line) {
                    Ok(Some(input)) => {
                        if tx.send(input).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(error) => warn!(%error, line = line.trim(), "ignored command"),
                }
            }
            debug!("command reader finished");
        })
        .context("failed to spawn command reader")?;
    Ok(rx)
}
