// Teams: FRC teams with their event schedule, fantasy teams, rosters, and
// waiver records.

use serde::{Deserialize, Serialize};

/// One event a team is registered for, tagged with its competition week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEvent {
    pub event_key: String,
    pub week: u32,
}

/// Anything that carries a week-tagged event schedule and, optionally, a
/// performance metric. The availability filter and ranked sort work over it.
pub trait Candidate {
    /// Week-tagged event associations.
    fn events(&self) -> &[TeamEvent];

    /// Ranked performance metric (EPA), when known.
    fn epa(&self) -> Option<f64> {
        None
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn events(&self) -> &[TeamEvent] {
        (**self).events()
    }

    fn epa(&self) -> Option<f64> {
        (**self).epa()
    }
}

/// A team not yet drafted (`/api/drafts/{id}/availableTeams`,
/// `/api/leagues/{id}/availableTeams`). Waiver teams share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableTeam {
    #[serde(deserialize_with = "super::team_number")]
    pub team_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub events: Vec<TeamEvent>,
    /// Pre-aggregated season-end EPA from the server, when it has one.
    #[serde(default)]
    pub year_end_epa: Option<f64>,
}

/// Teams on waivers (`/api/leagues/{id}/teamsOnWaivers`).
pub type WaiverTeam = AvailableTeam;

impl Candidate for AvailableTeam {
    fn events(&self) -> &[TeamEvent] {
        &self.events
    }

    fn epa(&self) -> Option<f64> {
        self.year_end_epa.filter(|v| v.is_finite())
    }
}

/// A fantasy team in a league (`/api/leagues/{id}/fantasyTeams`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FantasyTeam {
    pub fantasy_team_id: u32,
    pub team_name: String,
}

/// An event with its display name, as listed in roster-by-week data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEvent {
    pub event_key: String,
    #[serde(default)]
    pub event_name: String,
    pub week: u32,
}

/// One owned team and the events it attends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterWeekEntry {
    pub team_key: String,
    #[serde(default)]
    pub events: Vec<NamedEvent>,
}

/// Roster-by-week data (`/api/leagues/{id}/rosterWeeks`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FantasyTeamRosterWeek {
    pub fantasy_team_id: u32,
    pub fantasy_team_name: String,
    #[serde(default)]
    pub roster: Vec<RosterWeekEntry>,
}

/// Waiver claim order (`/api/leagues/{id}/waiverPriority`); lower claims first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiverPriority {
    pub fantasy_team_id: u32,
    pub fantasy_team_name: String,
    pub priority: u32,
}
