// League-week coverage: how many drafted teams each fantasy team has playing
// in each competition week, compared with the league's weekly start count.

use crate::model::{DraftPick, FantasyTeam};

use super::availability::EXCLUDED_WEEK;

/// How well a week is covered relative to the weekly start count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Enough teams to fill every start.
    Full,
    /// One short.
    Short,
    Uncovered,
}

/// Classify a week count against the league's weekly starts.
pub fn coverage_status(count: u32, weekly_starts: u32) -> Coverage {
    if count >= weekly_starts {
        Coverage::Full
    } else if count + 1 == weekly_starts {
        Coverage::Short
    } else {
        Coverage::Uncovered
    }
}

/// One fantasy team's per-week event counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekCoverageRow {
    pub fantasy_team_id: u32,
    pub team_name: String,
    /// `(week, count)` in the order of the requested weeks.
    pub counts: Vec<(u32, u32)>,
}

/// Count drafted-team events per week for every fantasy team.
///
/// Rows follow `teams`. Picks without a selection or belonging to a fantasy
/// team not in `teams` are skipped.
pub fn league_week_coverage(
    teams: &[FantasyTeam],
    picks: &[DraftPick],
    weeks: &[u32],
) -> Vec<WeekCoverageRow> {
    teams
        .iter()
        .map(|team| {
            let counts = weeks
                .iter()
                .map(|&week| {
                    let count = picks
                        .iter()
                        .filter(|p| {
                            p.fantasy_team_id == team.fantasy_team_id && p.team_picked.is_picked()
                        })
                        .flat_map(|p| p.events.iter())
                        .filter(|e| e.week == week && e.week != EXCLUDED_WEEK)
                        .count();
                    (week, count as u32)
                })
                .collect();
            WeekCoverageRow {
                fantasy_team_id: team.fantasy_team_id,
                team_name: team.team_name.clone(),
                counts,
            }
        })
        .collect()
}
