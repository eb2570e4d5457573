// Score-card shaping: padding lineups to a common height and picking the
// default score week.

use crate::model::{DraftStartedTeam, League, WeekLineups, WeekStatus};

/// Pad `items` with `None` up to `width` entries. Longer inputs are kept
/// whole.
pub fn pad_to<T>(items: &[T], width: usize) -> Vec<Option<&T>> {
    let mut padded: Vec<Option<&T>> = items.iter().map(Some).collect();
    if padded.len() < width {
        padded.resize(width, None);
    }
    padded
}

/// The largest lineup in a week, so every card in that week has equal rows.
pub fn max_lineup_size(week: &WeekLineups) -> usize {
    week.fantasy_teams
        .iter()
        .map(|l| l.teams.len())
        .max()
        .unwrap_or(0)
}

/// Find one week's lineups.
pub fn lineups_for_week(all: &[WeekLineups], week: u32) -> Option<&WeekLineups> {
    all.iter().find(|w| w.week == week)
}

/// The week the score view opens on: the current week when it belongs to the
/// league's season, otherwise week 1.
pub fn default_score_week(league: &League, current_week: Option<&WeekStatus>) -> u32 {
    match current_week {
        Some(week) if week.year == league.year && week.week > 0 => week.week,
        _ => 1,
    }
}

/// A draft-score card row: team number (blank when unfilled) and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftScoreRow {
    pub team_number: String,
    pub event_score: f64,
}

/// Pad a fantasy team's drafted-team scores to the league's weekly starts.
/// Empty rows score 0.
pub fn draft_score_rows(teams: &[DraftStartedTeam], weekly_starts: usize) -> Vec<DraftScoreRow> {
    pad_to(teams, weekly_starts)
        .into_iter()
        .take(weekly_starts.max(teams.len()))
        .map(|t| match t {
            Some(t) => DraftScoreRow {
                team_number: t.team_number.clone(),
                event_score: t.event_score,
            },
            None => DraftScoreRow {
                team_number: String::new(),
                event_score: 0.0,
            },
        })
        .collect()
}
