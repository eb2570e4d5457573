// Wire types for every read-only endpoint the board consumes.

pub mod draft;
pub mod event;
pub mod league;
pub mod score;
pub mod team;

pub use draft::{Draft, DraftOrderEntry, DraftPick, LeagueDraft, PickSelection};
pub use event::EventData;
pub use league::{League, WeekStatus};
pub use score::{
    DraftStartedTeam, FantasyTeamEventScore, FantasyTeamLineup, FantasyTeamWeekScore,
    LeagueRanking, LineupTeam, ScoreBreakdown, StartedTeamScore, WeekLineups,
    WeeklyRankingScore,
};
pub use team::{
    AvailableTeam, Candidate, FantasyTeam, FantasyTeamRosterWeek, NamedEvent,
    RosterWeekEntry, TeamEvent, WaiverPriority, WaiverTeam,
};

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Shared deserialization helpers
// ---------------------------------------------------------------------------

/// Decode a list that the API may send as `null` (e.g. pick events for
/// non-FiM leagues) into an empty `Vec`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// Decode a team identifier sent either as a JSON number (`1234`) or as a
/// string (`"1234"`, `"frc1234"`) into its bare textual form.
pub(crate) fn team_key_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => crate::links::strip_team_prefix(s.trim()).to_string(),
    })
}

/// Decode a team number sent either as a JSON number or a numeric string.
pub(crate) fn team_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => u32::try_from(n).map_err(serde::de::Error::custom),
        NumberOrText::Text(s) => crate::links::strip_team_prefix(s.trim())
            .parse()
            .map_err(serde::de::Error::custom),
    }
}
