// Messages between the app orchestrator and the TUI.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use fim_core::model::{
    AvailableTeam, Draft, DraftOrderEntry, DraftPick, EventData, FantasyTeam,
    FantasyTeamEventScore, FantasyTeamRosterWeek, FantasyTeamWeekScore, League, LeagueDraft,
    LeagueRanking, WaiverPriority, WaiverTeam, WeekLineups, WeekStatus,
};

// ---------------------------------------------------------------------------
// Tabs and sections
// ---------------------------------------------------------------------------

/// Main panel tabs, in key order (`1`..`7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    DraftBoard,
    Available,
    LeagueWeeks,
    Waivers,
    Scores,
    EventData,
    Rosters,
}

impl TabId {
    pub const ALL: [TabId; 7] = [
        TabId::DraftBoard,
        TabId::Available,
        TabId::LeagueWeeks,
        TabId::Waivers,
        TabId::Scores,
        TabId::EventData,
        TabId::Rosters,
    ];

    pub fn next(self) -> TabId {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> TabId {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Independently loaded parts of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// League list shown before a draft is opened.
    Leagues,
    /// Drafts of one league in the league list.
    LeagueDrafts(u32),
    CurrentWeek,
    Draft,
    League,
    FantasyTeams,
    DraftOrder,
    Picks,
    AvailableTeams,
    PickEpa,
    TeamsOnWaivers,
    WaiverPriority,
    RosterWeeks,
    WeekScores,
    Lineups,
    DraftScores,
    Rankings,
    EventData,
}

/// Load state of one section as the TUI sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for SectionState<T> {
    fn default() -> Self {
        SectionState::Loading
    }
}

impl<T> SectionState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SectionState::Loading)
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A decoded response, as cached by the orchestrator and forwarded to the
/// TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Leagues(Vec<League>),
    LeagueDrafts {
        league_id: u32,
        drafts: Vec<LeagueDraft>,
    },
    CurrentWeek(Option<WeekStatus>),
    Draft(Draft),
    League(League),
    FantasyTeams(Vec<FantasyTeam>),
    DraftOrder(Vec<DraftOrderEntry>),
    Picks(Vec<DraftPick>),
    AvailableTeams(Vec<AvailableTeam>),
    /// EPA for picked teams in the metric year.
    PickEpa {
        year: i32,
        values: HashMap<String, Option<f64>>,
    },
    TeamsOnWaivers(Vec<WaiverTeam>),
    WaiverPriority(Vec<WaiverPriority>),
    RosterWeeks(Vec<FantasyTeamRosterWeek>),
    WeekScores {
        week: u32,
        scores: Vec<FantasyTeamWeekScore>,
    },
    Lineups(Vec<WeekLineups>),
    DraftScores(Vec<FantasyTeamEventScore>),
    Rankings(Vec<LeagueRanking>),
    EventData(Vec<EventData>),
    /// One team's EPA; cache-only, merged into `PickEpa` for the TUI.
    TeamEpa(Option<f64>),
}

impl Payload {
    pub fn section(&self) -> Section {
        match self {
            Payload::Leagues(_) => Section::Leagues,
            Payload::LeagueDrafts { league_id, .. } => Section::LeagueDrafts(*league_id),
            Payload::CurrentWeek(_) => Section::CurrentWeek,
            Payload::Draft(_) => Section::Draft,
            Payload::League(_) => Section::League,
            Payload::FantasyTeams(_) => Section::FantasyTeams,
            Payload::DraftOrder(_) => Section::DraftOrder,
            Payload::Picks(_) => Section::Picks,
            Payload::AvailableTeams(_) => Section::AvailableTeams,
            Payload::PickEpa { .. } | Payload::TeamEpa(_) => Section::PickEpa,
            Payload::TeamsOnWaivers(_) => Section::TeamsOnWaivers,
            Payload::WaiverPriority(_) => Section::WaiverPriority,
            Payload::RosterWeeks(_) => Section::RosterWeeks,
            Payload::WeekScores { .. } => Section::WeekScores,
            Payload::Lineups(_) => Section::Lineups,
            Payload::DraftScores(_) => Section::DraftScores,
            Payload::Rankings(_) => Section::Rankings,
            Payload::EventData(_) => Section::EventData,
        }
    }
}

// ---------------------------------------------------------------------------
// Channel messages
// ---------------------------------------------------------------------------

/// Orchestrator -> TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// A new draft was opened; every section starts over.
    DraftSelected(u32),
    Loading(Section),
    Loaded(Box<Payload>),
    Failed { section: Section, message: String },
    /// Picks were refreshed from the server.
    Refreshed(DateTime<Local>),
}

/// TUI -> orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Open another draft.
    LoadDraft(u32),
    /// Refetch everything for the open draft.
    Refresh,
    /// Show weekly scores and lineups for a week.
    SelectScoreWeek(u32),
    Quit,
}
