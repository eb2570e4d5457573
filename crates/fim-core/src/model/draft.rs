// Draft metadata, draft order, and individual pick representation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::team::{Candidate, TeamEvent};

/// The string the API sends in `team_picked` for a slot nobody has filled.
pub const UNPICKED_SENTINEL: &str = "-1";

/// Generic information about one draft (`/api/drafts/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub draft_id: u32,
    pub league_id: u32,
    /// Event the draft is tied to (offseason drafts); absent for season drafts.
    #[serde(default)]
    pub event_key: Option<String>,
    pub rounds: u32,
}

/// A draft as listed under a league (`/api/leagues/{id}/drafts`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueDraft {
    pub draft_id: u32,
    pub rounds: u32,
    #[serde(default)]
    pub event_key: Option<String>,
}

/// One participant's seat in the draft order, sorted by `draft_slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrderEntry {
    pub fantasy_team_id: u32,
    pub draft_slot: u32,
}

// ---------------------------------------------------------------------------
// PickSelection
// ---------------------------------------------------------------------------

/// What a pick slot holds: a selected team, or nothing yet.
///
/// Replaces the `"-1"` string sentinel used on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PickSelection {
    /// A team number in bare form (`"1234"`, never `"frc1234"`).
    Picked(String),
    #[default]
    Unpicked,
}

impl PickSelection {
    /// Decode the wire form: the sentinel and blank strings mean unpicked.
    pub fn from_wire(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == UNPICKED_SENTINEL {
            PickSelection::Unpicked
        } else {
            PickSelection::Picked(crate::links::strip_team_prefix(trimmed).to_string())
        }
    }

    /// The selected team number, if any.
    pub fn team(&self) -> Option<&str> {
        match self {
            PickSelection::Picked(team) => Some(team),
            PickSelection::Unpicked => None,
        }
    }

    pub fn is_picked(&self) -> bool {
        matches!(self, PickSelection::Picked(_))
    }
}

impl fmt::Display for PickSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickSelection::Picked(team) => write!(f, "{team}"),
            PickSelection::Unpicked => Ok(()),
        }
    }
}

impl Serialize for PickSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PickSelection::Picked(team) => serializer.serialize_str(team),
            PickSelection::Unpicked => serializer.serialize_str(UNPICKED_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for PickSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
            Missing(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) if n < 0 => PickSelection::Unpicked,
            Raw::Number(n) => PickSelection::Picked(n.to_string()),
            Raw::Text(s) => PickSelection::from_wire(&s),
            Raw::Missing(()) => PickSelection::Unpicked,
        })
    }
}

// ---------------------------------------------------------------------------
// DraftPick
// ---------------------------------------------------------------------------

/// A single draft pick record (`/api/drafts/{id}/picks`), in pick order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Overall pick number (1-indexed).
    pub pick_number: u32,
    /// Fantasy team that owns this pick.
    pub fantasy_team_id: u32,
    /// The selected team, or `Unpicked`.
    #[serde(default)]
    pub team_picked: PickSelection,
    /// Events the selected team competes in. The API sends `null` for
    /// leagues that are not FiM; that decodes as empty.
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub events: Vec<TeamEvent>,
}

impl Candidate for DraftPick {
    fn events(&self) -> &[TeamEvent] {
        &self.events
    }
}
