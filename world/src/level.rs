use serde::{Deserialize, Serialize};
use snake_puzzle_core::{
    is_valid_side_length, Block, CellCoord, GrowthRate, HandlerId, Handlers, LevelEvent,
    LevelEventKind, Stamped, ValidationError, MAX_SNAKE_LENGTH, MIN_SNAKE_LENGTH,
};
use tracing::{debug, info};

use crate::{map::Map, verify};

/// Serializable form of a level exchanged with adapters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LevelRecord {
    /// Display name of the level.
    pub name: String,
    /// Map code, one character per cell.
    pub map: String,
    /// Initial snake length.
    pub length: u32,
    /// Growth rate as `[numerator, denominator]`.
    pub growth_rate: [u32; 2],
    /// Verified solution, if one was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

/// Editable description of a playable arena.
///
/// Every setter validates its input. Changing the map, the initial length or
/// the growth rate discards any stored solution because it may no longer
/// win the level.
#[derive(Debug)]
pub struct Level {
    name: String,
    map: Map,
    length: u32,
    growth_rate: GrowthRate,
    solution: Option<String>,
    handlers: Handlers<LevelEvent>,
}

impl Level {
    /// Creates a level with an empty map of the provided side length.
    pub fn new(
        name: impl Into<String>,
        side_length: u32,
        length: u32,
        growth_rate: GrowthRate,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_name(name.into())?,
            map: Map::blank(side_length)?,
            length: validate_length(length)?,
            growth_rate,
            solution: None,
            handlers: Handlers::new(),
        })
    }

    /// Restores a level from its serializable form.
    ///
    /// A recorded solution is only kept when it still verifies against the
    /// restored level.
    pub fn from_record(record: LevelRecord) -> Result<Self, ValidationError> {
        let [numerator, denominator] = record.growth_rate;
        let mut level = Self {
            name: validate_name(record.name)?,
            map: Map::parse(&record.map)?,
            length: validate_length(record.length)?,
            growth_rate: GrowthRate::new(numerator, denominator)?,
            solution: None,
            handlers: Handlers::new(),
        };
        if let Some(code) = record.solution {
            if !level.set_solution(&code) {
                debug!(level = %level.name, "discarding recorded solution that no longer verifies");
            }
        }
        Ok(level)
    }

    /// Captures the serializable form of the level.
    #[must_use]
    pub fn to_record(&self) -> LevelRecord {
        LevelRecord {
            name: self.name.clone(),
            map: self.map.render(false),
            length: self.length,
            growth_rate: self.growth_rate.into(),
            solution: self.solution.clone(),
        }
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the level. Names must contain a non-whitespace character.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    /// Current map.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Map code, optionally split into one line per row.
    #[must_use]
    pub fn render_map(&self, with_line_breaks: bool) -> String {
        self.map.render(with_line_breaks)
    }

    /// Replaces the whole map after validating `code`.
    pub fn set_map(&mut self, code: &str) -> Result<(), ValidationError> {
        let map = Map::parse(code)?;
        self.replace_map(map);
        Ok(())
    }

    /// Number of cells along each map edge.
    #[must_use]
    pub fn side_length(&self) -> u32 {
        self.map.side_length()
    }

    /// Initial snake length.
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Sets the initial snake length (1 to 10).
    pub fn set_length(&mut self, length: u32) -> Result<(), ValidationError> {
        let length = validate_length(length)?;
        if length != self.length {
            self.discard_solution();
        }
        self.length = length;
        Ok(())
    }

    /// Growth rate applied when the snake eats.
    #[must_use]
    pub fn growth_rate(&self) -> GrowthRate {
        self.growth_rate
    }

    /// Sets the growth rate to one of the allowed fractions.
    pub fn set_growth_rate(
        &mut self,
        numerator: u32,
        denominator: u32,
    ) -> Result<(), ValidationError> {
        let growth_rate = GrowthRate::new(numerator, denominator)?;
        if growth_rate != self.growth_rate {
            self.discard_solution();
        }
        self.growth_rate = growth_rate;
        Ok(())
    }

    /// Verified solution, if any.
    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    /// Adopts `code` as the solution if it wins a fresh game of this level.
    ///
    /// Returns whether the code was adopted. A rejected code leaves any
    /// previously stored solution untouched.
    pub fn set_solution(&mut self, code: &str) -> bool {
        if !verify::check_solution(self, code) {
            return false;
        }
        info!(level = %self.name, code, "adopted verified solution");
        self.solution = Some(code.to_owned());
        true
    }

    /// Reports whether `code` wins a fresh game of this level.
    #[must_use]
    pub fn check_solution(&self, code: &str) -> bool {
        verify::check_solution(self, code)
    }

    /// Block stored at `(x, y)`, or `None` outside the map.
    #[must_use]
    pub fn block(&self, x: u32, y: u32) -> Option<Block> {
        self.map.block(CellCoord::new(x, y))
    }

    /// Writes a single block.
    ///
    /// Writing [`Block::Snake`] first clears any existing snake marker and
    /// announces the move. Writes that change nothing are ignored.
    pub fn set_block(&mut self, x: u32, y: u32, block: Block) -> Result<(), ValidationError> {
        let cell = CellCoord::new(x, y);
        let current = self
            .map
            .block(cell)
            .ok_or(ValidationError::CellOutOfBounds {
                x,
                y,
                side_length: self.side_length(),
            })?;
        if current == block {
            return Ok(());
        }

        let was_playable = self.is_playable();
        self.discard_solution();

        let mut events = Vec::new();
        if block == Block::Snake {
            if let Some(previous) = self.map.snake_cell() {
                self.map.set(previous, Block::Empty);
                events.push(LevelEvent::SnakeMove {
                    previous,
                    current: cell,
                });
            }
        }
        self.map.set(cell, block);

        let playable = self.is_playable();
        if playable != was_playable {
            events.push(LevelEvent::PlayabilityChange { playable });
        }

        for event in events {
            self.handlers.trigger(event);
        }
        Ok(())
    }

    /// Reports whether the map holds a snake start cell.
    #[must_use]
    pub fn has_snake(&self) -> bool {
        self.map.snake_cell().is_some()
    }

    /// Number of food cells on the map.
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.map.count(Block::Food)
    }

    /// A level is playable when it has a snake start cell and some food.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.has_snake() && self.food_count() > 0
    }

    /// Changes the side length, padding or cropping the right and bottom edges.
    pub fn resize(&mut self, side_length: u32) -> Result<(), ValidationError> {
        if !is_valid_side_length(side_length) {
            return Err(ValidationError::InvalidSideLength(side_length));
        }
        if side_length != self.side_length() {
            let resized = self.map.resized(side_length);
            self.replace_map(resized);
        }
        Ok(())
    }

    /// Moves the map content by `(dx, dy)` cells, wrapping across edges.
    pub fn offset(&mut self, dx: i64, dy: i64) {
        let shifted = self.map.shifted(dx, dy);
        self.replace_map(shifted);
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        let cleared = self.map.emptied();
        self.replace_map(cleared);
    }

    /// Turns every empty cell into food.
    pub fn fill_with_food(&mut self) {
        let filled = self.map.replaced(Block::Empty, Block::Food);
        self.replace_map(filled);
    }

    /// Subscribes `handler` to level events of `kind`.
    pub fn bind<F>(&mut self, kind: LevelEventKind, handler: F) -> HandlerId
    where
        F: FnMut(&Stamped<LevelEvent>) + 'static,
    {
        self.handlers.bind(kind, handler)
    }

    /// Unsubscribes a handler, returning `false` if it was not subscribed.
    pub fn unbind(&mut self, kind: LevelEventKind, id: HandlerId) -> bool {
        self.handlers.unbind(kind, id)
    }

    /// Handlers subscribed to `kind`, in dispatch order.
    #[must_use]
    pub fn handlers(&self, kind: LevelEventKind) -> Vec<HandlerId> {
        self.handlers.handlers(kind)
    }

    fn replace_map(&mut self, map: Map) {
        let was_playable = self.is_playable();
        let previous_snake = self.map.snake_cell();
        let previous_side_length = self.map.side_length();

        if map != self.map {
            self.discard_solution();
        }
        self.map = map;

        let mut events = Vec::new();
        if let (Some(previous), Some(current)) = (previous_snake, self.map.snake_cell()) {
            if previous != current {
                events.push(LevelEvent::SnakeMove { previous, current });
            }
        }
        let playable = self.is_playable();
        if playable != was_playable {
            events.push(LevelEvent::PlayabilityChange { playable });
        }
        let side_length = self.map.side_length();
        if side_length != previous_side_length {
            events.push(LevelEvent::Resize {
                previous_side_length,
                side_length,
            });
        }

        for event in events {
            self.handlers.trigger(event);
        }
    }

    fn discard_solution(&mut self) {
        if let Some(code) = self.solution.take() {
            debug!(level = %self.name, %code, "level edited, solution discarded");
        }
    }
}

/// Copies the level data. Subscribed handlers stay with the original.
impl Clone for Level {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            map: self.map.clone(),
            length: self.length,
            growth_rate: self.growth_rate,
            solution: self.solution.clone(),
            handlers: Handlers::new(),
        }
    }
}

fn validate_name(name: String) -> Result<String, ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(name)
    }
}

fn validate_length(length: u32) -> Result<u32, ValidationError> {
    if (MIN_SNAKE_LENGTH..=MAX_SNAKE_LENGTH).contains(&length) {
        Ok(length)
    } else {
        Err(ValidationError::InvalidLength(length))
    }
}
