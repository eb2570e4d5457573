// In-memory `DataSource` backed by fixed data.
//
// Serves the same shapes as the HTTP client without a network, counts calls
// per endpoint and can be told to fail an endpoint. Used by tests across the
// workspace.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use fim_core::model::{
    AvailableTeam, Draft, DraftOrderEntry, DraftPick, EventData, FantasyTeam,
    FantasyTeamEventScore, FantasyTeamRosterWeek, FantasyTeamWeekScore, League,
    LeagueDraft, LeagueRanking, WaiverPriority, WaiverTeam, WeekLineups, WeekStatus,
};

use crate::api::{ApiError, DataSource};

/// Backing data. Missing map entries answer `NotFound`, except picks, which
/// answer an empty list like a draft whose rows are not generated yet.
#[derive(Debug, Clone, Default)]
pub struct MemoryData {
    pub current_week: Option<WeekStatus>,
    pub leagues: HashMap<u32, League>,
    pub fantasy_teams: HashMap<u32, Vec<FantasyTeam>>,
    pub league_drafts: HashMap<u32, Vec<LeagueDraft>>,
    pub drafts: HashMap<u32, Draft>,
    pub draft_orders: HashMap<u32, Vec<DraftOrderEntry>>,
    pub picks: HashMap<u32, Vec<DraftPick>>,
    pub available_teams: HashMap<u32, Vec<AvailableTeam>>,
    pub teams_on_waivers: HashMap<u32, Vec<WaiverTeam>>,
    pub waiver_priority: HashMap<u32, Vec<WaiverPriority>>,
    pub roster_weeks: HashMap<u32, Vec<FantasyTeamRosterWeek>>,
    pub lineups: HashMap<u32, Vec<WeekLineups>>,
    /// Keyed by `(league_id, week)`.
    pub week_scores: HashMap<(u32, u32), Vec<FantasyTeamWeekScore>>,
    pub draft_scores: HashMap<u32, Vec<FantasyTeamEventScore>>,
    pub rankings: HashMap<u32, Vec<LeagueRanking>>,
    pub event_data: Vec<EventData>,
    /// Keyed by `(team_number, year)`.
    pub epa: HashMap<(String, i32), f64>,
}

#[derive(Default)]
struct Inner {
    data: MemoryData,
    calls: HashMap<&'static str, usize>,
    failing: HashSet<&'static str>,
}

#[derive(Default)]
pub struct MemorySource {
    inner: Mutex<Inner>,
}

impl MemorySource {
    pub fn new(data: MemoryData) -> Self {
        Self {
            inner: Mutex::new(Inner {
                data,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the backing data, e.g. to record a new pick between polls.
    pub fn update(&self, f: impl FnOnce(&mut MemoryData)) {
        f(&mut self.lock().data);
    }

    /// Number of calls made to `endpoint` (the `DataSource` method name).
    pub fn calls(&self, endpoint: &str) -> usize {
        self.lock().calls.get(endpoint).copied().unwrap_or(0)
    }

    /// Make `endpoint` answer with a 500 until [`MemorySource::recover`].
    pub fn fail(&self, endpoint: &'static str) {
        self.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.lock().failing.remove(endpoint);
    }

    fn serve<T>(
        &self,
        endpoint: &'static str,
        pick: impl FnOnce(&MemoryData) -> Option<T>,
    ) -> Result<T, ApiError> {
        let mut inner = self.lock();
        *inner.calls.entry(endpoint).or_default() += 1;
        if inner.failing.contains(endpoint) {
            return Err(ApiError::Status {
                url: format!("memory://{endpoint}"),
                status: 500,
            });
        }
        pick(&inner.data).ok_or_else(|| ApiError::NotFound {
            url: format!("memory://{endpoint}"),
        })
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn current_week(&self) -> Result<Option<WeekStatus>, ApiError> {
        self.serve("current_week", |d| Some(d.current_week))
    }

    async fn leagues(&self) -> Result<Vec<League>, ApiError> {
        self.serve("leagues", |d| Some(d.leagues.values().cloned().collect()))
    }

    async fn league(&self, league_id: u32) -> Result<League, ApiError> {
        self.serve("league", |d| d.leagues.get(&league_id).cloned())
    }

    async fn fantasy_teams(&self, league_id: u32) -> Result<Vec<FantasyTeam>, ApiError> {
        self.serve("fantasy_teams", |d| d.fantasy_teams.get(&league_id).cloned())
    }

    async fn league_drafts(&self, league_id: u32) -> Result<Vec<LeagueDraft>, ApiError> {
        self.serve("league_drafts", |d| d.league_drafts.get(&league_id).cloned())
    }

    async fn draft(&self, draft_id: u32) -> Result<Draft, ApiError> {
        self.serve("draft", |d| d.drafts.get(&draft_id).cloned())
    }

    async fn draft_order(&self, draft_id: u32) -> Result<Vec<DraftOrderEntry>, ApiError> {
        self.serve("draft_order", |d| d.draft_orders.get(&draft_id).cloned())
    }

    async fn picks(&self, draft_id: u32) -> Result<Vec<DraftPick>, ApiError> {
        self.serve("picks", |d| Some(d.picks.get(&draft_id).cloned().unwrap_or_default()))
    }

    async fn available_teams(&self, draft_id: u32) -> Result<Vec<AvailableTeam>, ApiError> {
        self.serve("available_teams", |d| d.available_teams.get(&draft_id).cloned())
    }

    async fn teams_on_waivers(&self, league_id: u32) -> Result<Vec<WaiverTeam>, ApiError> {
        self.serve("teams_on_waivers", |d| d.teams_on_waivers.get(&league_id).cloned())
    }

    async fn waiver_priority(&self, league_id: u32) -> Result<Vec<WaiverPriority>, ApiError> {
        self.serve("waiver_priority", |d| d.waiver_priority.get(&league_id).cloned())
    }

    async fn roster_weeks(&self, league_id: u32) -> Result<Vec<FantasyTeamRosterWeek>, ApiError> {
        self.serve("roster_weeks", |d| d.roster_weeks.get(&league_id).cloned())
    }

    async fn lineups(&self, league_id: u32) -> Result<Vec<WeekLineups>, ApiError> {
        self.serve("lineups", |d| d.lineups.get(&league_id).cloned())
    }

    async fn week_scores(
        &self,
        league_id: u32,
        week: u32,
    ) -> Result<Vec<FantasyTeamWeekScore>, ApiError> {
        self.serve("week_scores", |d| d.week_scores.get(&(league_id, week)).cloned())
    }

    async fn draft_scores(&self, draft_id: u32) -> Result<Vec<FantasyTeamEventScore>, ApiError> {
        self.serve("draft_scores", |d| d.draft_scores.get(&draft_id).cloned())
    }

    async fn rankings(&self, league_id: u32) -> Result<Vec<LeagueRanking>, ApiError> {
        self.serve("rankings", |d| d.rankings.get(&league_id).cloned())
    }

    async fn event_data(&self) -> Result<Vec<EventData>, ApiError> {
        self.serve("event_data", |d| Some(d.event_data.clone()))
    }

    async fn epa(
        &self,
        teams: &[String],
        year: i32,
    ) -> Result<HashMap<String, Option<f64>>, ApiError> {
        self.serve("epa", |d| {
            Some(
                teams
                    .iter()
                    .map(|t| (t.clone(), d.epa.get(&(t.clone(), year)).copied()))
                    .collect(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fim_core::model::PickSelection;

    #[tokio::test]
    async fn missing_entries_are_not_found() {
        let source = MemorySource::default();
        let err = source.draft(4).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(source.calls("draft"), 1);
    }

    #[tokio::test]
    async fn failing_endpoint_recovers() {
        let source = MemorySource::default();
        source.fail("event_data");
        assert!(matches!(
            source.event_data().await,
            Err(ApiError::Status { status: 500, .. })
        ));
        source.recover("event_data");
        assert!(source.event_data().await.unwrap().is_empty());
        assert_eq!(source.calls("event_data"), 2);
    }

    #[tokio::test]
    async fn updates_are_visible_to_later_calls() {
        let source = MemorySource::default();
        assert!(source.picks(1).await.unwrap().is_empty());
        source.update(|d| {
            d.picks.insert(
                1,
                vec![DraftPick {
                    pick_number: 1,
                    fantasy_team_id: 4,
                    team_picked: PickSelection::Picked("33".into()),
                    events: Vec::new(),
                }],
            );
        });
        assert_eq!(source.picks(1).await.unwrap().len(), 1);
    }
}
