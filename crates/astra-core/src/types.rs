//! Domain types shared across the pipeline crates.

use serde::{Deserialize, Serialize};

/// A single row returned by the graph store.
///
/// Insertion-ordered field-name to value mapping; the formatter's shape
/// detection keys off the field names of the first row, so order and names
/// must be preserved exactly as the store returned them.
pub type ResultRow = serde_json::Map<String, serde_json::Value>;

/// Channel an utterance arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Web,
    Messaging,
}

/// Entity category an utterance can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Satellite,
    Mission,
    Vehicle,
    Agency,
    Technology,
}

impl EntityCategory {
    /// Parse a category name as used by callers (singular or plural).
    ///
    /// Returns `None` for unsupported categories; callers surface that as
    /// an unknown-category failure rather than guessing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "satellite" | "satellites" => Some(Self::Satellite),
            "mission" | "missions" => Some(Self::Mission),
            "vehicle" | "vehicles" | "rocket" | "rockets" => Some(Self::Vehicle),
            "agency" | "agencies" => Some(Self::Agency),
            "technology" | "technologies" => Some(Self::Technology),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Satellite => "satellite",
            Self::Mission => "mission",
            Self::Vehicle => "vehicle",
            Self::Agency => "agency",
            Self::Technology => "technology",
        }
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
