// Scores, lineups, and league rankings.

use serde::{Deserialize, Serialize};

/// How a team's score for a week or event is made up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBreakdown {
    pub qual_points: f64,
    pub alliance_points: f64,
    pub elim_points: f64,
    pub award_points: f64,
    pub rookie_points: f64,
    pub stat_correction: f64,
}

/// A started team's score inside a weekly fantasy score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedTeamScore {
    #[serde(deserialize_with = "super::team_key_text")]
    pub team_number: String,
    #[serde(default)]
    pub weekly_score: f64,
    #[serde(default)]
    pub breakdown: ScoreBreakdown,
}

/// A fantasy team's score for one league week
/// (`/api/leagues/{id}/fantasyScores/{week}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FantasyTeamWeekScore {
    pub fantasy_team_id: u32,
    pub fantasy_team_name: String,
    #[serde(default)]
    pub weekly_score: f64,
    #[serde(default)]
    pub rank_points: f64,
    pub week: u32,
    #[serde(default)]
    pub teams: Vec<StartedTeamScore>,
}

/// A drafted team's score at the draft's event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftStartedTeam {
    #[serde(deserialize_with = "super::team_key_text")]
    pub team_number: String,
    #[serde(default)]
    pub event_score: f64,
    #[serde(default)]
    pub breakdown: ScoreBreakdown,
}

/// A fantasy team's score for an offseason draft
/// (`/api/drafts/{id}/fantasyScores`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FantasyTeamEventScore {
    pub fantasy_team_id: u32,
    pub fantasy_team_name: String,
    #[serde(default)]
    pub event_score: f64,
    #[serde(default)]
    pub rank_points: f64,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub teams: Vec<DraftStartedTeam>,
}

/// A team in a fantasy lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupTeam {
    #[serde(deserialize_with = "super::team_key_text")]
    pub team_number: String,
}

/// A fantasy team's starters for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FantasyTeamLineup {
    pub fantasy_team_id: u32,
    pub fantasy_team_name: String,
    #[serde(default)]
    pub teams: Vec<LineupTeam>,
}

/// All lineups for one week (`/api/leagues/{id}/lineups`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLineups {
    pub week: u32,
    #[serde(default)]
    pub fantasy_teams: Vec<FantasyTeamLineup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRankingScore {
    pub week: u32,
    #[serde(default)]
    pub ranking_points: f64,
    #[serde(default)]
    pub weekly_score: f64,
}

/// Cumulative standing (`/api/leagues/{id}/rankings`), already sorted by
/// the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRanking {
    pub fantasy_team_id: u32,
    pub fantasy_team_name: String,
    #[serde(default)]
    pub total_ranking_points: f64,
    #[serde(default)]
    pub tiebreaker: f64,
    #[serde(default)]
    pub weekly_scores: Vec<WeeklyRankingScore>,
}
