use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use snake_puzzle_core::{
    Block, CellCoord, ConstraintViolation, Direction, GameEvent, GameEventKind, HandlerId,
    Handlers, Phase, Stamped, PILL_SEGMENT_CUT,
};
use snake_puzzle_system_step_codec::Steps;
use tracing::{debug, info, trace};

use crate::{level::Level, map::Map, verify};

/// Cell reached by moving the head one step in some direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    /// Block currently stored in the cell.
    pub block: Block,
    /// Linear position of the cell.
    pub position: usize,
    /// Coordinates of the cell.
    pub cell: CellCoord,
}

/// Moves recorded by a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepLog {
    /// Recorded steps.
    #[serde(flatten)]
    pub steps: Steps,
    /// Whether the recorded steps win the level. Absent in endless mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_solution: Option<bool>,
}

#[derive(Debug)]
enum Mode {
    Finite { food_remaining: usize },
    Endless { seed: u64, rng: ChaCha8Rng },
}

impl Mode {
    fn endless(seed: u64) -> Self {
        Self::Endless {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

/// Single snake simulation advanced one discrete move at a time.
///
/// A game owns a private copy of the level it was built from, so edits to
/// the level after construction never leak into play. The map marks every
/// occupied cell with [`Block::Snake`]; the segment list, head first, is the
/// authoritative record of where the body is.
#[derive(Debug)]
pub struct Game {
    level: Level,
    map: Map,
    segments: Vec<CellCoord>,
    direction: Option<Direction>,
    previous_direction: Option<Direction>,
    alive: bool,
    won: bool,
    mode: Mode,
    food_eaten: u32,
    times_grown: u32,
    steps: Steps,
    handlers: Handlers<GameEvent>,
}

impl Game {
    /// Starts a game that is won by eating every piece of food on the level.
    pub fn new(level: &Level) -> Result<Self, ConstraintViolation> {
        if !level.is_playable() {
            return Err(ConstraintViolation::Unplayable);
        }
        let mode = Mode::Finite {
            food_remaining: level.food_count(),
        };
        Self::start(level.clone(), mode).ok_or(ConstraintViolation::Unplayable)
    }

    /// Starts a game on a level without food where food respawns forever.
    ///
    /// Respawned food is placed by a generator seeded with `seed`, so two
    /// endless games with the same seed and moves play out identically.
    pub fn endless(level: &Level, seed: u64) -> Result<Self, ConstraintViolation> {
        if !level.has_snake() {
            return Err(ConstraintViolation::MissingSnake);
        }
        let food = level.food_count();
        if food > 0 {
            return Err(ConstraintViolation::FoodPresent(food));
        }
        Self::start(level.clone(), Mode::endless(seed)).ok_or(ConstraintViolation::MissingSnake)
    }

    fn start(level: Level, mode: Mode) -> Option<Self> {
        let map = level.map().clone();
        let head = map.snake_cell()?;
        let length = level.length() as usize;
        let mut game = Self {
            level,
            map,
            segments: vec![head; length.max(1)],
            direction: None,
            previous_direction: None,
            alive: true,
            won: false,
            mode,
            food_eaten: 0,
            times_grown: 0,
            steps: Steps::new(),
            handlers: Handlers::new(),
        };
        if game.is_endless() {
            game.won = !game.spawn_food();
        }
        Some(game)
    }

    /// Puts the game back into its initial state, keeping subscribed handlers.
    pub fn restart(&mut self) {
        let mode = match &self.mode {
            Mode::Finite { .. } => Mode::Finite {
                food_remaining: self.level.food_count(),
            },
            Mode::Endless { seed, .. } => Mode::endless(*seed),
        };
        if let Some(mut fresh) = Self::start(self.level.clone(), mode) {
            std::mem::swap(&mut fresh.handlers, &mut self.handlers);
            *self = fresh;
        }
    }

    /// Steers the snake. Returns `false` and changes nothing when the move is
    /// not allowed.
    ///
    /// A direction is refused when it points into a wall, when the game is
    /// over, or when it reverses the last direction taken while the snake is
    /// longer than a single segment.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.is_done() {
            return false;
        }
        let reverses = self.previous_direction.is_some_and(|previous| {
            direction.shares_axis_with(previous) && direction != previous
        });
        if reverses && self.segments.len() > 1 {
            debug!(?direction, "refusing to reverse into the body");
            return false;
        }
        if self.block_in_direction(direction).block == Block::Wall {
            debug!(?direction, "refusing to turn into a wall");
            return false;
        }
        self.direction = Some(direction);
        true
    }

    /// Steers toward `direction` and then advances one step.
    ///
    /// Returns `false` without moving if the direction is refused.
    pub fn step_in(&mut self, direction: Direction) -> bool {
        self.set_direction(direction) && self.step()
    }

    /// Advances the snake one cell in the current direction.
    ///
    /// Returns `false` when no direction is set, the game is over, or the
    /// move runs into a wall. Bumping a wall also clears the direction so a
    /// new one must be chosen. Events raised by the move are delivered to
    /// handlers before this returns.
    pub fn step(&mut self) -> bool {
        let Some(direction) = self.direction else {
            return false;
        };
        if self.is_done() {
            return false;
        }
        self.previous_direction = Some(direction);

        let target = self.block_in_direction(direction);
        if target.block == Block::Wall {
            debug!(?direction, cell = %target.cell, "bumped into a wall");
            self.direction = None;
            return false;
        }

        let mut events = Vec::new();
        match target.block {
            Block::Food => self.eat(target.cell, &mut events),
            Block::Pill => self.shrink(),
            Block::DeadlyWall => self.alive = false,
            Block::Snake if Some(target.position) != self.map.index(self.tail()) => {
                self.alive = false;
            }
            _ => {}
        }

        let tail = self.tail();
        let penultimate = self.segments[self.segments.len().saturating_sub(2)];
        self.map.set_index(target.position, Block::Snake);
        if (tail != penultimate || self.segments.len() == 1)
            && self.map.index(tail) != Some(target.position)
        {
            self.map.set(tail, Block::Empty);
        }

        let mut lead = target.cell;
        for segment in &mut self.segments {
            let from = std::mem::replace(segment, lead);
            if from.manhattan_distance(lead) > 1 {
                events.push(GameEvent::Loop {
                    from,
                    to: lead,
                    direction: wrap_direction(from, lead),
                });
            }
            lead = from;
        }

        if target.block == Block::Food && self.is_endless() {
            self.won = !self.spawn_food();
        }

        self.steps.push(direction);
        trace!(?direction, head = %target.cell, length = self.segments.len(), "advanced");

        if self.is_done() {
            info!(
                won = self.won,
                steps = self.steps.length,
                code = %self.steps.code,
                "game finished"
            );
            events.push(GameEvent::Done {
                cell: target.cell,
                won: self.won,
            });
        }
        for event in events {
            self.handlers.trigger(event);
        }
        true
    }

    fn eat(&mut self, cell: CellCoord, events: &mut Vec<GameEvent>) {
        if let Mode::Finite { food_remaining } = &mut self.mode {
            *food_remaining = food_remaining.saturating_sub(1);
            self.won = *food_remaining == 0;
        }
        self.food_eaten = self.food_eaten.saturating_add(1);
        events.push(GameEvent::Eat { cell });

        if self
            .level
            .growth_rate()
            .permits_growth(self.times_grown, self.food_eaten)
        {
            let tail = self.tail();
            self.segments.push(tail);
            self.times_grown = self.times_grown.saturating_add(1);
        }
    }

    fn shrink(&mut self) {
        let kept = self.segments.len().saturating_sub(PILL_SEGMENT_CUT).max(1);
        let removed: Vec<CellCoord> = self.segments.drain(kept..).collect();
        for cell in removed {
            if !self.segments.contains(&cell) {
                self.map.set(cell, Block::Empty);
            }
        }
    }

    /// Places one food cell on a random empty cell, falling back to pill
    /// cells once the map has no empty cell left. Returns `false` when
    /// there is nowhere to put it.
    fn spawn_food(&mut self) -> bool {
        let Mode::Endless { rng, .. } = &mut self.mode else {
            return false;
        };
        let mut candidates = self.map.positions_of(Block::Empty);
        if candidates.is_empty() {
            candidates = self.map.positions_of(Block::Pill);
        }
        if candidates.is_empty() {
            return false;
        }
        let position = candidates[rng.gen_range(0..candidates.len())];
        self.map.set_index(position, Block::Food);
        true
    }

    /// Cell the head would enter by moving in `direction`.
    #[must_use]
    pub fn block_in_direction(&self, direction: Direction) -> Target {
        let cell = self.map.neighbor(self.head(), direction);
        let position = self.map.index(cell).unwrap_or_default();
        Target {
            block: self.map.cells()[position],
            position,
            cell,
        }
    }

    /// Live map as seen by the player.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Map code, optionally split into one line per row.
    #[must_use]
    pub fn render_map(&self, with_line_breaks: bool) -> String {
        self.map.render(with_line_breaks)
    }

    /// Copy of the segment coordinates, head first.
    #[must_use]
    pub fn snake_coords(&self) -> Vec<CellCoord> {
        self.segments.clone()
    }

    /// Current head cell.
    #[must_use]
    pub fn head(&self) -> CellCoord {
        self.segments[0]
    }

    fn tail(&self) -> CellCoord {
        self.segments[self.segments.len() - 1]
    }

    /// Current number of segments.
    #[must_use]
    pub fn length(&self) -> usize {
        self.segments.len()
    }

    /// Steps taken so far.
    #[must_use]
    pub fn steps(&self) -> StepLog {
        StepLog {
            steps: self.steps.clone(),
            is_solution: (!self.is_endless()).then_some(self.won),
        }
    }

    /// Pending direction, if any.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Food left to clear the level, or `None` in endless mode.
    #[must_use]
    pub fn food_count(&self) -> Option<usize> {
        match self.mode {
            Mode::Finite { food_remaining } => Some(food_remaining),
            Mode::Endless { .. } => None,
        }
    }

    /// Pieces of food eaten so far.
    #[must_use]
    pub fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    /// Reports whether the snake is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Reports whether the game was won.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Reports whether the game is over.
    #[must_use]
    pub fn is_done(&self) -> bool {
        !self.alive || self.won
    }

    /// Reports whether food respawns indefinitely.
    #[must_use]
    pub fn is_endless(&self) -> bool {
        matches!(self.mode, Mode::Endless { .. })
    }

    /// Lifecycle stage of the game.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_done() {
            Phase::Done
        } else if self.direction.is_none() && self.previous_direction.is_none() {
            Phase::Ready
        } else {
            Phase::Running
        }
    }

    /// Level snapshot the game was built from.
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Reports whether `code` wins a fresh game of the same level.
    ///
    /// Always `false` in endless mode, which has no winning state to reach.
    #[must_use]
    pub fn check_solution(&self, code: &str) -> bool {
        !self.is_endless() && verify::check_solution(&self.level, code)
    }

    /// Subscribes `handler` to game events of `kind`.
    pub fn bind<F>(&mut self, kind: GameEventKind, handler: F) -> HandlerId
    where
        F: FnMut(&Stamped<GameEvent>) + 'static,
    {
        self.handlers.bind(kind, handler)
    }

    /// Unsubscribes a handler, returning `false` if it was not subscribed.
    pub fn unbind(&mut self, kind: GameEventKind, id: HandlerId) -> bool {
        self.handlers.unbind(kind, id)
    }

    /// Handlers subscribed to `kind`, in dispatch order.
    #[must_use]
    pub fn handlers(&self, kind: GameEventKind) -> Vec<HandlerId> {
        self.handlers.handlers(kind)
    }
}

/// Direction of travel for a segment that wrapped from `from` to `to`.
fn wrap_direction(from: CellCoord, to: CellCoord) -> Direction {
    if from.x() == to.x() {
        if to.y() < from.y() {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if to.x() < from.x() {
        Direction::Right
    } else {
        Direction::Left
    }
}
