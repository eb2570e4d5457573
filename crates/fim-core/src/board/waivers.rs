// Waiver table rows: one event-key column per week.

use crate::model::{League, WaiverTeam};

use super::availability::{filter_available, WeekSelection};

/// A waiver table row.
#[derive(Debug, Clone, PartialEq)]
pub struct WaiverRow {
    pub team_number: u32,
    pub team_name: String,
    /// Event key per requested week; `None` when the team has no event then.
    pub week_events: Vec<Option<String>>,
    pub year_end_epa: Option<f64>,
}

/// Build waiver rows for `weeks`, filtered by `selected` when the league is
/// FiM. Server order is kept.
pub fn waiver_rows(
    teams: &[WaiverTeam],
    weeks: &[u32],
    selected: &WeekSelection,
    is_fim: bool,
) -> Vec<WaiverRow> {
    filter_available(teams, selected, is_fim)
        .into_iter()
        .map(|team| WaiverRow {
            team_number: team.team_number,
            team_name: team.name.clone(),
            week_events: weeks
                .iter()
                .map(|&week| {
                    team.events
                        .iter()
                        .find(|e| e.week == week)
                        .map(|e| e.event_key.clone())
                })
                .collect(),
            year_end_epa: team.year_end_epa,
        })
        .collect()
}

/// Season shown in the waiver EPA column header.
pub fn waiver_epa_year(league: &League) -> i32 {
    if league.is_fim {
        league.year - 1
    } else {
        league.year
    }
}
