//! Bounded FIFO of human-readable combat lines.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Who or what produced a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSource {
    /// Player attacks.
    Player,
    /// Enemy attacks.
    Enemy,
    /// Caravan events.
    Korovan,
    /// Gold and items gained.
    Loot,
    /// Market transactions.
    Trade,
    /// Wounds and bleeding.
    Body,
    /// Everything else.
    System,
    /// Save and load.
    Save,
}

impl LogSource {
    /// Stable tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::Korovan => "korovan",
            Self::Loot => "loot",
            Self::Trade => "trade",
            Self::Body => "body",
            Self::System => "system",
            Self::Save => "save",
        }
    }
}

/// One log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Message text.
    pub msg: String,
    /// Producer.
    pub source: LogSource,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.source.tag(), self.msg)
    }
}

/// Keeps the last `capacity` lines; the oldest is dropped on overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl Default for CombatLog {
    fn default() -> Self {
        Self::new(8)
    }
}

impl CombatLog {
    /// Empty log holding at most `capacity` lines (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line.
    pub fn add(&mut self, msg: impl Into<String>, source: LogSource) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            msg: msg.into(),
            source,
        });
    }

    /// Lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Number of lines held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// No lines held?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
