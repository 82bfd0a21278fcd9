use std::{fmt, str::FromStr, time::SystemTime};

use serde::{Deserialize, Serialize};

use crate::{CellCoord, Direction, ValidationError};

/// Event payload that can be routed to handlers subscribed to its kind.
pub trait Notification {
    /// Closed set of kinds handlers subscribe to.
    type Kind: Copy + Eq + fmt::Debug;

    /// Kind used to select the handlers that receive this event.
    fn kind(&self) -> Self::Kind;
}

/// Kinds of events emitted by a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEventKind {
    /// The snake ate a piece of food.
    Eat,
    /// A segment wrapped across a grid edge.
    Loop,
    /// The game reached its terminal state.
    Done,
}

impl GameEventKind {
    /// Every game event kind.
    pub const ALL: [GameEventKind; 3] = [Self::Eat, Self::Loop, Self::Done];

    /// Name used for the kind at the serialization boundary.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eat => "eat",
            Self::Loop => "loop",
            Self::Done => "done",
        }
    }
}

impl FromStr for GameEventKind {
    type Err = ValidationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ValidationError::UnknownEventName(name.to_owned()))
    }
}

impl fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events broadcast by a game while it processes a step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// The head entered a food cell.
    Eat {
        /// Cell holding the food that was eaten.
        cell: CellCoord,
    },
    /// A segment moved across a grid edge instead of to an adjacent cell.
    Loop {
        /// Cell the segment occupied before the step.
        from: CellCoord,
        /// Cell the segment occupies after the step.
        to: CellCoord,
        /// Direction the segment travelled while wrapping.
        direction: Direction,
    },
    /// The game finished during the step.
    Done {
        /// Cell the head moved into on the final step.
        cell: CellCoord,
        /// Whether the game ended in a win.
        won: bool,
    },
}

impl Notification for GameEvent {
    type Kind = GameEventKind;

    fn kind(&self) -> GameEventKind {
        match self {
            Self::Eat { .. } => GameEventKind::Eat,
            Self::Loop { .. } => GameEventKind::Loop,
            Self::Done { .. } => GameEventKind::Done,
        }
    }
}

/// Kinds of events emitted by a level while it is edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelEventKind {
    /// The snake start cell moved.
    SnakeMove,
    /// The level became playable or stopped being playable.
    PlayabilityChange,
    /// The map side length changed.
    Resize,
}

impl LevelEventKind {
    /// Every level event kind.
    pub const ALL: [LevelEventKind; 3] = [Self::SnakeMove, Self::PlayabilityChange, Self::Resize];

    /// Name used for the kind at the serialization boundary.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SnakeMove => "snakeMove",
            Self::PlayabilityChange => "playabilityChange",
            Self::Resize => "resize",
        }
    }
}

impl FromStr for LevelEventKind {
    type Err = ValidationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ValidationError::UnknownEventName(name.to_owned()))
    }
}

impl fmt::Display for LevelEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events broadcast by a level after an edit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelEvent {
    /// The snake start marker relocated.
    SnakeMove {
        /// Start cell before the edit.
        previous: CellCoord,
        /// Start cell after the edit.
        current: CellCoord,
    },
    /// Playability flipped.
    PlayabilityChange {
        /// Whether the level is playable after the edit.
        playable: bool,
    },
    /// The map was resized.
    Resize {
        /// Side length before the edit.
        previous_side_length: u32,
        /// Side length after the edit.
        side_length: u32,
    },
}

impl Notification for LevelEvent {
    type Kind = LevelEventKind;

    fn kind(&self) -> LevelEventKind {
        match self {
            Self::SnakeMove { .. } => LevelEventKind::SnakeMove,
            Self::PlayabilityChange { .. } => LevelEventKind::PlayabilityChange,
            Self::Resize { .. } => LevelEventKind::Resize,
        }
    }
}

/// Event delivered to handlers along with the moment it was triggered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stamped<E> {
    /// Event payload.
    pub event: E,
    /// Wall-clock time at which the event was triggered.
    pub timestamp: SystemTime,
}

/// Handle identifying a subscribed handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

type Handler<E> = Box<dyn FnMut(&Stamped<E>)>;

struct Entry<E: Notification> {
    kind: E::Kind,
    id: HandlerId,
    handler: Handler<E>,
}

/// Per-instance registry mapping event kinds to ordered handler lists.
///
/// Handlers run synchronously on the triggering thread in subscription
/// order. A panicking handler unwinds through [`Handlers::trigger`] and the
/// remaining handlers for that event are skipped.
pub struct Handlers<E: Notification> {
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E: Notification> Handlers<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Subscribes `handler` to events of `kind`, returning its handle.
    pub fn bind<F>(&mut self, kind: E::Kind, handler: F) -> HandlerId
    where
        F: FnMut(&Stamped<E>) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push(Entry {
            kind,
            id,
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a handler. Returns `false` when it was not subscribed to `kind`.
    pub fn unbind(&mut self, kind: E::Kind, id: HandlerId) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.kind == kind && entry.id == id)
        else {
            return false;
        };
        let _ = self.entries.remove(index);
        true
    }

    /// Handles subscribed to `kind`, in dispatch order.
    #[must_use]
    pub fn handlers(&self, kind: E::Kind) -> Vec<HandlerId> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.id)
            .collect()
    }

    /// Delivers `event` to every handler subscribed to its kind.
    pub fn trigger(&mut self, event: E) {
        let kind = event.kind();
        let stamped = Stamped {
            event,
            timestamp: SystemTime::now(),
        };
        for entry in self.entries.iter_mut().filter(|entry| entry.kind == kind) {
            (entry.handler)(&stamped);
        }
    }

    /// Number of subscribed handlers across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no handler is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Notification> Default for Handlers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Notification> fmt::Debug for Handlers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("next_id", &self.next_id)
            .field("subscribed", &self.entries.len())
            .finish()
    }
}
