// Week-gated availability filtering.
//
// FiM leagues let the user narrow candidate teams to those competing in the
// selected weeks. Week 99 marks events that never count toward a week and is
// left out of every week comparison and display.

use std::collections::BTreeSet;

use crate::model::{Candidate, TeamEvent};

/// Week tag the backend uses for events outside the weekly schedule.
pub const EXCLUDED_WEEK: u32 = 99;

/// Week checkboxes offered on the draft board.
pub const DRAFT_WEEK_OPTIONS: [u32; 5] = [1, 2, 3, 4, 6];

/// Week columns offered on the waiver view.
pub const WAIVER_WEEK_OPTIONS: [u32; 5] = [1, 2, 3, 4, 5];

/// The set of weeks the user has checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeekSelection {
    weeks: BTreeSet<u32>,
}

impl WeekSelection {
    /// Every option selected, the initial state of each view.
    pub fn all(options: &[u32]) -> Self {
        Self::from_weeks(options.iter().copied())
    }

    pub fn from_weeks(weeks: impl IntoIterator<Item = u32>) -> Self {
        WeekSelection {
            weeks: weeks.into_iter().filter(|w| *w != EXCLUDED_WEEK).collect(),
        }
    }

    /// Flip one week on or off.
    pub fn toggle(&mut self, week: u32) {
        if week == EXCLUDED_WEEK {
            return;
        }
        if !self.weeks.remove(&week) {
            self.weeks.insert(week);
        }
    }

    pub fn contains(&self, week: u32) -> bool {
        week != EXCLUDED_WEEK && self.weeks.contains(&week)
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.weeks.iter().copied()
    }
}

/// Whether any of `events` falls in a selected week.
pub fn competes_in_any(events: &[TeamEvent], selected: &WeekSelection) -> bool {
    events.iter().any(|e| selected.contains(e.week))
}

/// Filter candidates by selected weeks when the gate is on; otherwise pass
/// everything through. Input order is preserved either way.
pub fn filter_available<'a, T: Candidate>(
    entities: &'a [T],
    selected: &WeekSelection,
    gate_enabled: bool,
) -> Vec<&'a T> {
    entities
        .iter()
        .filter(|e| !gate_enabled || competes_in_any(e.events(), selected))
        .collect()
}

/// The weeks a team competes in, ascending, without the excluded week.
pub fn competing_weeks(events: &[TeamEvent]) -> Vec<u32> {
    let mut weeks: Vec<u32> = events
        .iter()
        .map(|e| e.week)
        .filter(|w| *w != EXCLUDED_WEEK)
        .collect();
    weeks.sort_unstable();
    weeks
}

/// Card text for a team's weeks, e.g. `"1, 4"`. Empty when it has none.
pub fn format_weeks(events: &[TeamEvent]) -> String {
    competing_weeks(events)
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AvailableTeam;

    fn team(number: u32, weeks: &[u32]) -> AvailableTeam {
        AvailableTeam {
            team_number: number,
            name: format!("Team {number}"),
            events: weeks
                .iter()
                .map(|w| TeamEvent {
                    event_key: format!("2025ev{w}"),
                    week: *w,
                })
                .collect(),
            year_end_epa: None,
        }
    }

    fn numbers(teams: &[&AvailableTeam]) -> Vec<u32> {
        teams.iter().map(|t| t.team_number).collect()
    }

    #[test]
    fn gate_off_returns_everything_in_order() {
        let teams = vec![team(3, &[]), team(1, &[99]), team(2, &[5])];
        let selected = WeekSelection::from_weeks([1]);
        let out = filter_available(&teams, &selected, false);
        assert_eq!(numbers(&out), vec![3, 1, 2]);
    }

    #[test]
    fn gate_on_keeps_teams_in_selected_weeks() {
        let teams = vec![team(10, &[1, 4]), team(20, &[99]), team(30, &[3])];
        let selected = WeekSelection::from_weeks([2, 4]);
        let out = filter_available(&teams, &selected, true);
        assert_eq!(numbers(&out), vec![10]);
    }

    #[test]
    fn gate_on_drops_teams_without_events() {
        let teams = vec![team(10, &[]), team(20, &[2])];
        let selected = WeekSelection::all(&DRAFT_WEEK_OPTIONS);
        assert_eq!(numbers(&filter_available(&teams, &selected, true)), vec![20]);
        assert_eq!(
            numbers(&filter_available(&teams, &selected, false)),
            vec![10, 20]
        );
    }

    #[test]
    fn excluded_week_never_matches() {
        let selected = WeekSelection::from_weeks([99, 1]);
        assert!(!selected.contains(99));
        assert!(!competes_in_any(&team(5, &[99]).events, &selected));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selected = WeekSelection::all(&DRAFT_WEEK_OPTIONS);
        selected.toggle(3);
        assert!(!selected.contains(3));
        selected.toggle(3);
        assert!(selected.contains(3));
        selected.toggle(99);
        assert_eq!(selected.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn weeks_display_sorted_without_excluded() {
        let t = team(1, &[4, 99, 1]);
        assert_eq!(competing_weeks(&t.events), vec![1, 4]);
        assert_eq!(format_weeks(&t.events), "1, 4");
        assert_eq!(format_weeks(&team(2, &[99]).events), "");
    }
}
