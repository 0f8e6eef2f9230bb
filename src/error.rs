//! Error types for gameplay actions, configuration and snapshots.
//!
//! The simulation itself never fails mid-frame; these types cover the
//! explicit "this action was refused" results and the I/O edges.

use std::fmt;

use crate::body::BodyPartId;
use crate::items::ItemId;

/// A gameplay action that was refused without mutating any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// Prosthetic fitting on a part that is not severed.
    PartNotSevered(BodyPartId),
    /// Prosthetic item is not allowed on the given part.
    ProstheticNotAllowed {
        /// The target part.
        part: BodyPartId,
        /// The offered prosthetic.
        item: ItemId,
    },
    /// No severed part accepts the offered prosthetic.
    NoSeveredPartFor(ItemId),
    /// Attack on a caravan that has already been looted.
    AlreadyLooted,
    /// Inventory does not hold enough of an item.
    NotEnough {
        /// Item requested.
        item: ItemId,
        /// Quantity requested.
        wanted: u32,
        /// Quantity held.
        held: u32,
    },
    /// Item has the wrong type for the requested action.
    WrongItemKind {
        /// Item offered.
        item: ItemId,
        /// Expected kind, e.g. "weapon".
        expected: &'static str,
    },
    /// Market in the current zone does not sell this item.
    NotStocked(ItemId),
    /// Market stock for this item is exhausted.
    OutOfStock(ItemId),
    /// Not enough gold for a purchase.
    NotEnoughGold {
        /// Gold required.
        price: u32,
        /// Gold held.
        held: u32,
    },
    /// The actor is dead.
    Dead,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartNotSevered(part) => write!(f, "{part} is not severed"),
            Self::ProstheticNotAllowed { part, item } => {
                write!(f, "{item} does not fit the {part}")
            }
            Self::NoSeveredPartFor(item) => write!(f, "no severed part accepts {item}"),
            Self::AlreadyLooted => write!(f, "caravan already looted"),
            Self::NotEnough { item, wanted, held } => {
                write!(f, "not enough {item}: wanted {wanted}, have {held}")
            }
            Self::WrongItemKind { item, expected } => write!(f, "{item} is not a {expected}"),
            Self::NotStocked(item) => write!(f, "{item} is not sold here"),
            Self::OutOfStock(item) => write!(f, "{item} is out of stock"),
            Self::NotEnoughGold { price, held } => {
                write!(f, "not enough gold: need {price}, have {held}")
            }
            Self::Dead => write!(f, "dead actors cannot act"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Invalid simulation configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A value is out of its accepted range.
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not valid JSON for [`crate::config::SimConfig`].
    Parse(serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid { .. } => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Snapshot save/load failure.
#[derive(Debug)]
pub enum SnapshotError {
    /// Filesystem error.
    Io(std::io::Error),
    /// Malformed snapshot JSON.
    Json(serde_json::Error),
    /// Snapshot written by an incompatible version.
    Version {
        /// Version found in the snapshot.
        found: String,
        /// Version this build reads.
        expected: &'static str,
    },
    /// The configuration supplied for the restored session is invalid.
    Config(ConfigError),
    /// Stored entity state contradicts itself.
    Invalid(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "snapshot I/O error: {e}"),
            Self::Json(e) => write!(f, "snapshot format error: {e}"),
            Self::Version { found, expected } => {
                write!(f, "snapshot version {found} is not supported (expected {expected})")
            }
            Self::Config(e) => write!(f, "cannot restore snapshot: {e}"),
            Self::Invalid(reason) => write!(f, "inconsistent snapshot: {reason}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Version { .. } | Self::Invalid(_) => None,
            Self::Config(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for SnapshotError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
