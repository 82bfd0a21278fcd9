#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for creating, editing, playing and verifying snake
//! puzzle levels exchanged as transfer strings.

mod config;
mod input;
mod level_transfer;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use snake_puzzle_core::{
    Direction, GameEvent, GameEventKind, GrowthRate, LevelEvent, LevelEventKind,
};
use snake_puzzle_system_step_codec::decode;
use snake_puzzle_world::{Game, Level};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::CliConfig,
    input::{move_letter, Placement},
};

#[derive(Debug, Parser)]
#[command(name = "snake-puzzle")]
#[command(version, about = "Build, play and verify snake puzzle levels")]
struct Cli {
    /// TOML file with defaults for new levels
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a level and print its transfer string
    New {
        /// Level name
        #[arg(long)]
        name: Option<String>,
        /// Side length of a blank map (15-21)
        #[arg(long)]
        side: Option<u32>,
        /// Initial snake length (1-10)
        #[arg(long)]
        length: Option<u32>,
        /// Growth rate as p/q
        #[arg(long, value_parser = input::parse_growth_rate)]
        growth: Option<GrowthRate>,
        /// Text file holding the map, one row per line
        #[arg(long)]
        map: Option<PathBuf>,
    },
    /// Describe a level
    Show {
        /// Level transfer string
        level: String,
    },
    /// Apply edits to a level and print the new transfer string
    Edit {
        /// Level transfer string
        level: String,
        /// New level name
        #[arg(long)]
        name: Option<String>,
        /// New initial snake length
        #[arg(long)]
        length: Option<u32>,
        /// New growth rate as p/q
        #[arg(long, value_parser = input::parse_growth_rate)]
        growth: Option<GrowthRate>,
        /// Resize the map to this side length
        #[arg(long)]
        resize: Option<u32>,
        /// Shift the map content by dx,dy
        #[arg(long, value_parser = input::parse_offset, allow_hyphen_values = true)]
        offset: Option<(i64, i64)>,
        /// Empty every cell before other block edits
        #[arg(long)]
        clear: bool,
        /// Write a block as x,y,block; may repeat
        #[arg(long = "set", value_parser = input::parse_placement)]
        placements: Vec<Placement>,
        /// Turn every empty cell into food after block edits
        #[arg(long)]
        fill_food: bool,
        /// Adopt this step code as the solution if it wins
        #[arg(long)]
        solution: Option<String>,
        /// Report these level events on stderr (snakeMove, playabilityChange, resize)
        #[arg(long, value_delimiter = ',')]
        events: Vec<LevelEventKind>,
    },
    /// Play moves on a level and report what happened
    Play {
        /// Level transfer string
        level: String,
        /// Moves as U/R/D/L letters, or a step code with --code
        moves: String,
        /// Read the moves as a step code
        #[arg(long)]
        code: bool,
        /// Play in endless mode with this food seed
        #[arg(long)]
        endless: Option<u64>,
        /// Only report these events (eat, loop, done)
        #[arg(long, value_delimiter = ',')]
        events: Vec<GameEventKind>,
    },
    /// Check whether a step code wins a level
    Verify {
        /// Level transfer string
        level: String,
        /// Step code to replay
        code: String,
    },
}

/// Entry point for the snake puzzle command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    debug!(?config, "loaded configuration");

    match cli.command {
        Command::New {
            name,
            side,
            length,
            growth,
            map,
        } => {
            let level = new_level(&config, name, side, length, growth, map)?;
            println!("{}", level_transfer::encode(&level)?);
        }
        Command::Show { level } => show(&level_transfer::decode(&level)?),
        Command::Edit {
            level,
            name,
            length,
            growth,
            resize,
            offset,
            clear,
            placements,
            fill_food,
            solution,
            events,
        } => {
            let mut level = level_transfer::decode(&level)?;
            for kind in events {
                let _ = level.bind(kind, |stamped| eprintln!("{}", describe_edit(&stamped.event)));
            }
            if let Some(name) = name {
                level.set_name(name)?;
            }
            if let Some(length) = length {
                level.set_length(length)?;
            }
            if let Some(growth) = growth {
                level.set_growth_rate(growth.numerator(), growth.denominator())?;
            }
            if let Some(side) = resize {
                level.resize(side)?;
            }
            if let Some((dx, dy)) = offset {
                level.offset(dx, dy);
            }
            if clear {
                level.clear();
            }
            for Placement { x, y, block } in placements {
                level
                    .set_block(x, y, block)
                    .with_context(|| format!("cannot place {block:?} at ({x}, {y})"))?;
            }
            if fill_food {
                level.fill_with_food();
            }
            if let Some(code) = solution {
                if !level.set_solution(&code) {
                    bail!("step code '{code}' does not win '{}'", level.name());
                }
            }
            println!("{}", level_transfer::encode(&level)?);
        }
        Command::Play {
            level,
            moves,
            code,
            endless,
            events,
        } => {
            let level = level_transfer::decode(&level)?;
            let moves = if code {
                decode(&moves)?.directions().collect()
            } else {
                input::parse_moves(&moves)?
            };
            play(&level, &moves, endless, &events)?;
        }
        Command::Verify { level, code } => {
            let level = level_transfer::decode(&level)?;
            if !level.check_solution(&code) {
                bail!("step code '{code}' does not win '{}'", level.name());
            }
            info!(level = %level.name(), %code, "solution verified");
            println!("'{code}' wins '{}'", level.name());
        }
    }
    Ok(())
}

fn new_level(
    config: &CliConfig,
    name: Option<String>,
    side: Option<u32>,
    length: Option<u32>,
    growth: Option<GrowthRate>,
    map: Option<PathBuf>,
) -> Result<Level> {
    let mut level = Level::new(
        name.unwrap_or_else(|| config.name.clone()),
        side.unwrap_or(config.side_length),
        length.unwrap_or(config.length),
        growth.unwrap_or(config.growth_rate),
    )?;
    if let Some(path) = map {
        let rows = fs::read_to_string(&path)
            .with_context(|| format!("failed to read map file {}", path.display()))?;
        level
            .set_map(&input::map_code_from_rows(&rows))
            .with_context(|| format!("invalid map file {}", path.display()))?;
    }
    Ok(level)
}

fn show(level: &Level) {
    println!("name:     {}", level.name());
    println!("side:     {}", level.side_length());
    println!("length:   {}", level.length());
    println!("growth:   {}", level.growth_rate());
    println!("food:     {}", level.food_count());
    println!("playable: {}", level.is_playable());
    if let Some(solution) = level.solution() {
        println!("solution: {solution}");
    }
    println!();
    for row in level.render_map(true).lines() {
        println!("|{row}|");
    }
}

fn play(
    level: &Level,
    moves: &[Direction],
    endless: Option<u64>,
    events: &[GameEventKind],
) -> Result<()> {
    let mut game = match endless {
        Some(seed) => Game::endless(level, seed)?,
        None => Game::new(level)?,
    };
    let kinds = if events.is_empty() {
        &GameEventKind::ALL[..]
    } else {
        events
    };
    for &kind in kinds {
        let _ = game.bind(kind, |stamped| println!("{}", describe(&stamped.event)));
    }

    for (index, direction) in moves.iter().enumerate() {
        if game.is_done() {
            println!("game over after {index} moves; ignoring the rest");
            break;
        }
        if !game.step_in(*direction) {
            println!("move {} ({}) refused", index + 1, move_letter(*direction));
            break;
        }
    }

    let log = game.steps();
    println!();
    for row in game.render_map(true).lines() {
        println!("|{row}|");
    }
    println!("steps:  {} ({})", log.steps.length, log.steps.code);
    println!("length: {}", game.length());
    println!("alive:  {}", game.is_alive());
    match game.food_count() {
        Some(remaining) => println!("food:   {remaining} left"),
        None => println!("food:   {} eaten", game.food_eaten()),
    }
    if game.is_won() {
        println!("won");
    }
    Ok(())
}

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::Eat { cell } => format!("eat at {cell}"),
        GameEvent::Loop {
            from,
            to,
            direction,
        } => format!("loop {from} -> {to} heading {}", move_letter(*direction)),
        GameEvent::Done { cell, won: true } => format!("done at {cell}: won"),
        GameEvent::Done { cell, won: false } => format!("done at {cell}: lost"),
    }
}

fn describe_edit(event: &LevelEvent) -> String {
    match event {
        LevelEvent::SnakeMove { previous, current } => {
            format!("snake start moved {previous} -> {current}")
        }
        LevelEvent::PlayabilityChange { playable: true } => "level became playable".to_owned(),
        LevelEvent::PlayabilityChange { playable: false } => {
            "level is no longer playable".to_owned()
        }
        LevelEvent::Resize {
            previous_side_length,
            side_length,
        } => format!("resized {previous_side_length} -> {side_length}"),
    }
}
