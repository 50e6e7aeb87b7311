//! Optional stylus/tablet hardware database.
//!
//! Some vendors publish per-model metadata that this stack cannot learn from
//! the device itself: how many buttons a given stylus model carries, whether
//! it is a puck-style mouse, and whether the tablet can be physically rotated
//! for left-handed use. The database is strictly a refinement — every lookup
//! failure, miss, or absence degrades to a type-based heuristic and is never
//! fatal.
//!
//! Two providers implement the abstraction: [`toml_db::TomlStylusDatabase`]
//! reads a TOML description file, [`HeuristicStylusDatabase`] answers
//! "not found" to everything and exists so that callers never branch on the
//! database being configured.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod toml_db;

/// Error type for database lookups. Callers log these and fall back; nothing
/// here aborts event processing.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The backing store could not be read.
    #[error("I/O error reading stylus database at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database file content could not be parsed.
    #[error("failed to parse stylus database TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The backend failed at lookup time.
    #[error("stylus database backend error: {0}")]
    Backend(String),
}

/// The broad stylus classes a database distinguishes.
///
/// All classes except [`Puck`] are pressure-sensitive pen variants.
///
/// [`Puck`]: StylusKind::Puck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylusKind {
    General,
    Inking,
    Classic,
    Stroke,
    Marker,
    Airbrush,
    /// Mouse-shaped tool resting flat on the tablet; reports pointer buttons
    /// and no pressure.
    Puck,
}

impl StylusKind {
    /// Whether tools of this class report pressure-style axes (pressure,
    /// distance, tilt).
    pub fn is_pressure_sensitive(self) -> bool {
        !matches!(self, StylusKind::Puck)
    }
}

/// Database record for one tablet model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabletEntry {
    pub name: String,
    /// Whether the hardware can be rotated 180° for left-handed use.
    pub reversible: bool,
}

/// Database record for one stylus model, keyed by hardware tool id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylusEntry {
    pub name: String,
    /// Number of physical buttons on the tool.
    pub buttons: u32,
    pub kind: StylusKind,
}

/// Lookup interface over the hardware database.
///
/// Both methods return `Ok(None)` for models the database does not know;
/// `Err` is reserved for backend failures. Either way the caller proceeds on
/// heuristics.
pub trait StylusDatabase: Send + Sync {
    /// Looks up a tablet model by USB identity.
    fn lookup_tablet(&self, vendor: u16, product: u16)
        -> Result<Option<TabletEntry>, DatabaseError>;

    /// Looks up a stylus model by its hardware tool id.
    fn lookup_stylus(&self, tool_id: u32) -> Result<Option<StylusEntry>, DatabaseError>;
}

/// The no-database provider: every lookup is a miss, so capability
/// resolution always takes the type-based heuristic path.
#[derive(Debug, Default)]
pub struct HeuristicStylusDatabase;

impl StylusDatabase for HeuristicStylusDatabase {
    fn lookup_tablet(
        &self,
        _vendor: u16,
        _product: u16,
    ) -> Result<Option<TabletEntry>, DatabaseError> {
        Ok(None)
    }

    fn lookup_stylus(&self, _tool_id: u32) -> Result<Option<StylusEntry>, DatabaseError> {
        Ok(None)
    }
}
