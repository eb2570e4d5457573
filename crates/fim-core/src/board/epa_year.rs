// Which season's EPA to show for a league.

use crate::model::{League, WeekStatus};

/// Pick the EPA season for a league.
///
/// Offseason leagues use their own year. In-season leagues use the prior
/// season until the league's own season has finished week 1, then switch to
/// the current season.
pub fn select_metric_year(
    league_year: i32,
    is_offseason: bool,
    current_week: Option<&WeekStatus>,
) -> i32 {
    if is_offseason {
        return league_year;
    }
    let prev_year = league_year - 1;
    match current_week {
        Some(week) if week.year == league_year => {
            if week.week == 1 {
                prev_year
            } else {
                league_year
            }
        }
        _ => prev_year,
    }
}

/// [`select_metric_year`] for a loaded league.
pub fn league_metric_year(league: &League, current_week: Option<&WeekStatus>) -> i32 {
    select_metric_year(league.year, league.offseason, current_week)
}
