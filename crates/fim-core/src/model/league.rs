// League settings and the global competition-week status.

use serde::{Deserialize, Serialize};

/// A fantasy league (`/api/leagues`, `/api/leagues/{id}`).
///
/// The list endpoint names the weekly start count `team_starts`, the detail
/// endpoint `weekly_starts`; both land in `weekly_starts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub league_id: u32,
    pub league_name: String,
    pub year: i32,
    /// FiM leagues gate availability by competition week.
    #[serde(default)]
    pub is_fim: bool,
    #[serde(default)]
    pub offseason: bool,
    #[serde(default, alias = "team_starts")]
    pub weekly_starts: u32,
    #[serde(default)]
    pub team_limit: Option<u32>,
    #[serde(default)]
    pub team_size_limit: Option<u32>,
}

/// The currently active competition week (`/api/currentWeek`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekStatus {
    pub year: i32,
    pub week: u32,
    #[serde(default)]
    pub lineups_locked: bool,
    #[serde(default)]
    pub scores_finalized: bool,
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_shape_maps_team_starts() {
        let json = r#"{"league_id": 3, "league_name": "FiM 2025", "year": 2025,
                       "team_limit": 8, "team_starts": 3, "is_fim": true,
                       "offseason": false, "team_size_limit": 6}"#;
        let league: League = serde_json::from_str(json).unwrap();
        assert_eq!(league.weekly_starts, 3);
        assert_eq!(league.team_limit, Some(8));
    }

    #[test]
    fn detail_shape_without_offseason_defaults_false() {
        let json = r#"{"league_id": 3, "league_name": "FiM 2025", "year": 2025,
                       "weekly_starts": 2, "is_fim": false}"#;
        let league: League = serde_json::from_str(json).unwrap();
        assert!(!league.offseason);
        assert_eq!(league.weekly_starts, 2);
        assert!(league.team_size_limit.is_none());
    }
}
