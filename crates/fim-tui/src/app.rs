// Application state and orchestration logic.
//
// One task owns every piece of fetched state. It answers TUI commands, serves
// reads from the response cache, starts background fetches and forwards their
// results to the TUI. Results tagged with a superseded generation (the user
// opened another draft, or picked another score week) are dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use fim_client::{
    lookup_epa, retry_fixed, spawn_poller, ApiError, DataSource, Lookup, QueryCache, QueryKey,
    RetryPolicy, Supersession,
};
use fim_core::board::{default_score_week, league_metric_year};
use fim_core::model::{DraftPick, League, WeekStatus};

use crate::config::Config;
use crate::protocol::{Payload, Section, UiUpdate, UserCommand};

/// How often expired cache entries are swept.
pub const GC_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Capacity of the channel background fetches report on.
pub const FETCH_CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Request families and fetch results
// ---------------------------------------------------------------------------

/// Groups of requests that are superseded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Everything shown for the open draft, and the league list before one
    /// is opened.
    Board,
    /// Weekly scores for the selected score week.
    Scores,
}

pub fn family_of(key: &QueryKey) -> Family {
    match key {
        QueryKey::WeekScores { .. } => Family::Scores,
        _ => Family::Board,
    }
}

/// Which board section a query fills.
pub fn section_of(key: &QueryKey) -> Section {
    match key {
        QueryKey::Leagues => Section::Leagues,
        QueryKey::LeagueDrafts(id) => Section::LeagueDrafts(*id),
        QueryKey::CurrentWeek => Section::CurrentWeek,
        QueryKey::League(_) => Section::League,
        QueryKey::FantasyTeams(_) => Section::FantasyTeams,
        QueryKey::Draft(_) => Section::Draft,
        QueryKey::DraftOrder(_) => Section::DraftOrder,
        QueryKey::Picks(_) => Section::Picks,
        QueryKey::AvailableTeams(_) => Section::AvailableTeams,
        QueryKey::TeamsOnWaivers(_) => Section::TeamsOnWaivers,
        QueryKey::WaiverPriority(_) => Section::WaiverPriority,
        QueryKey::RosterWeeks(_) => Section::RosterWeeks,
        QueryKey::Lineups(_) => Section::Lineups,
        QueryKey::WeekScores { .. } => Section::WeekScores,
        QueryKey::DraftScores(_) => Section::DraftScores,
        QueryKey::Rankings(_) => Section::Rankings,
        QueryKey::EventData => Section::EventData,
        QueryKey::Epa { .. } => Section::PickEpa,
    }
}

/// A background fetch reporting back to the orchestrator.
#[derive(Debug)]
pub enum Fetched {
    Query {
        family: Family,
        generation: u64,
        key: QueryKey,
        result: Result<Payload, String>,
    },
    Epa {
        generation: u64,
        year: i32,
        values: HashMap<String, Option<f64>>,
    },
}

/// Fetch one query from `source`.
///
/// Draft, league and current-week metadata are retried per `retry`; every
/// other endpoint gets a single attempt.
pub async fn fetch_payload(
    source: &dyn DataSource,
    key: &QueryKey,
    retry: RetryPolicy,
) -> Result<Payload, ApiError> {
    let payload = match key {
        QueryKey::Leagues => Payload::Leagues(source.leagues().await?),
        QueryKey::LeagueDrafts(id) => Payload::LeagueDrafts {
            league_id: *id,
            drafts: source.league_drafts(*id).await?,
        },
        QueryKey::CurrentWeek => {
            Payload::CurrentWeek(retry_fixed(|| source.current_week(), retry).await?)
        }
        QueryKey::Draft(id) => Payload::Draft(retry_fixed(|| source.draft(*id), retry).await?),
        QueryKey::League(id) => Payload::League(retry_fixed(|| source.league(*id), retry).await?),
        QueryKey::FantasyTeams(id) => Payload::FantasyTeams(source.fantasy_teams(*id).await?),
        QueryKey::DraftOrder(id) => Payload::DraftOrder(source.draft_order(*id).await?),
        QueryKey::Picks(id) => Payload::Picks(source.picks(*id).await?),
        QueryKey::AvailableTeams(id) => Payload::AvailableTeams(source.available_teams(*id).await?),
        QueryKey::TeamsOnWaivers(id) => Payload::TeamsOnWaivers(source.teams_on_waivers(*id).await?),
        QueryKey::WaiverPriority(id) => Payload::WaiverPriority(source.waiver_priority(*id).await?),
        QueryKey::RosterWeeks(id) => Payload::RosterWeeks(source.roster_weeks(*id).await?),
        QueryKey::Lineups(id) => Payload::Lineups(source.lineups(*id).await?),
        QueryKey::WeekScores { league_id, week } => Payload::WeekScores {
            week: *week,
            scores: source.week_scores(*league_id, *week).await?,
        },
        QueryKey::DraftScores(id) => Payload::DraftScores(source.draft_scores(*id).await?),
        QueryKey::Rankings(id) => Payload::Rankings(source.rankings(*id).await?),
        QueryKey::EventData => Payload::EventData(source.event_data().await?),
        QueryKey::Epa { team, year } => {
            let found = source.epa(std::slice::from_ref(team), *year).await?;
            Payload::TeamEpa(found.get(team).copied().flatten())
        }
    };
    Ok(payload)
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    source: Arc<dyn DataSource>,
    pub cache: QueryCache<Payload>,
    pub generations: Supersession<Family>,
    /// Generation each in-flight fetch was started under.
    in_flight: HashMap<QueryKey, u64>,
    pub draft_id: Option<u32>,
    pub league_id: Option<u32>,
    pub league: Option<League>,
    /// Outer `None`: not loaded yet. Inner `None`: no active week.
    pub current_week: Option<Option<WeekStatus>>,
    pub picks: Option<Vec<DraftPick>>,
    pub score_week: Option<u32>,
    /// Leagues listed while no draft is open.
    browse_leagues: Vec<u32>,
    /// Background fetches, aborted when their family is superseded.
    tasks: Vec<(Family, JoinHandle<()>)>,
    poller: Option<JoinHandle<()>>,
    fetch_tx: mpsc::Sender<Fetched>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn DataSource>, fetch_tx: mpsc::Sender<Fetched>) -> Self {
        let cache = QueryCache::new(config.cache_policy());
        AppState {
            config,
            source,
            cache,
            generations: Supersession::new(),
            in_flight: HashMap::new(),
            draft_id: None,
            league_id: None,
            league: None,
            current_week: None,
            picks: None,
            score_week: None,
            browse_leagues: Vec::new(),
            tasks: Vec::new(),
            poller: None,
            fetch_tx,
        }
    }

    /// Switch to `draft_id`: supersede everything in flight, reset derived
    /// state and request the draft's sections.
    pub async fn open_draft(&mut self, draft_id: u32, ui_tx: &mpsc::Sender<UiUpdate>) {
        info!("Opening draft {}", draft_id);
        self.generations.bump(Family::Board);
        self.generations.bump(Family::Scores);
        self.abort_family(Family::Board);
        self.abort_family(Family::Scores);
        self.in_flight.clear();
        self.stop_poller();

        self.draft_id = Some(draft_id);
        self.league_id = None;
        self.league = None;
        self.current_week = None;
        self.picks = None;
        self.score_week = None;

        let _ = ui_tx.send(UiUpdate::DraftSelected(draft_id)).await;
        self.request_all(
            [
                QueryKey::CurrentWeek,
                QueryKey::Draft(draft_id),
                QueryKey::DraftOrder(draft_id),
                QueryKey::Picks(draft_id),
                QueryKey::AvailableTeams(draft_id),
                QueryKey::EventData,
            ],
            ui_tx,
        )
        .await;
        self.start_poller(draft_id);
    }

    /// List leagues and their drafts so a draft id can be picked.
    pub async fn browse(&mut self, ui_tx: &mpsc::Sender<UiUpdate>) {
        info!("No draft selected, listing leagues");
        self.request_all([QueryKey::Leagues], ui_tx).await;
    }

    /// Mark everything the open draft shows as stale and refetch it. Cached
    /// values stay on screen until the new ones land.
    pub async fn refresh(&mut self, ui_tx: &mpsc::Sender<UiUpdate>) {
        let keys = self.tracked_keys();
        info!("Refreshing {} queries", keys.len());
        for key in &keys {
            self.cache.invalidate(key);
        }
        self.request_all(keys, ui_tx).await;
    }

    pub async fn select_score_week(&mut self, week: u32, ui_tx: &mpsc::Sender<UiUpdate>) {
        let Some(league_id) = self.league_id else {
            debug!("Score week {} selected before the league is known", week);
            return;
        };
        self.generations.bump(Family::Scores);
        self.abort_family(Family::Scores);
        self.score_week = Some(week);
        self.request_all([QueryKey::WeekScores { league_id, week }], ui_tx).await;
    }

    /// Every query behind the current view.
    fn tracked_keys(&self) -> Vec<QueryKey> {
        let mut keys = vec![QueryKey::CurrentWeek, QueryKey::EventData];
        let Some(draft_id) = self.draft_id else {
            keys.push(QueryKey::Leagues);
            keys.extend(self.browse_leagues.iter().map(|id| QueryKey::LeagueDrafts(*id)));
            return keys;
        };
        {
            keys.extend([
                QueryKey::Draft(draft_id),
                QueryKey::DraftOrder(draft_id),
                QueryKey::Picks(draft_id),
                QueryKey::AvailableTeams(draft_id),
            ]);
            if self.league.as_ref().is_some_and(|l| l.offseason) {
                keys.push(QueryKey::DraftScores(draft_id));
            }
        }
        if let Some(league_id) = self.league_id {
            keys.extend(league_keys(league_id));
            if let Some(week) = self.score_week {
                keys.push(QueryKey::WeekScores { league_id, week });
            }
        }
        keys
    }

    /// Serve `keys` from the cache where possible and fetch the rest.
    ///
    /// Applying a payload can reveal further queries (a draft names its
    /// league); those are queued and handled in the same pass.
    pub async fn request_all(
        &mut self,
        keys: impl IntoIterator<Item = QueryKey>,
        ui_tx: &mpsc::Sender<UiUpdate>,
    ) {
        let mut queue: VecDeque<QueryKey> = keys.into_iter().collect();
        while let Some(key) = queue.pop_front() {
            match self.cache.lookup(&key) {
                Lookup::Fresh(payload) => {
                    queue.extend(self.apply(payload, ui_tx).await);
                }
                Lookup::Stale(payload) => {
                    self.spawn_fetch(key);
                    queue.extend(self.apply(payload, ui_tx).await);
                }
                Lookup::Missing => {
                    if self.spawn_fetch(key.clone()) {
                        let _ = ui_tx.send(UiUpdate::Loading(section_of(&key))).await;
                    }
                }
            }
        }
    }

    /// Record what a payload tells us about the draft, forward it to the
    /// TUI and return the follow-up queries it makes possible.
    async fn apply(&mut self, payload: Payload, ui_tx: &mpsc::Sender<UiUpdate>) -> Vec<QueryKey> {
        let mut follow_ups = Vec::new();
        let mut epa_inputs_changed = false;

        match &payload {
            Payload::Leagues(leagues) => {
                self.browse_leagues = leagues.iter().map(|l| l.league_id).collect();
                follow_ups.extend(self.browse_leagues.iter().map(|id| QueryKey::LeagueDrafts(*id)));
            }
            Payload::Draft(draft) => {
                self.league_id = Some(draft.league_id);
                follow_ups.push(QueryKey::League(draft.league_id));
                follow_ups.extend(league_keys(draft.league_id));
            }
            Payload::League(league) => {
                self.league = Some(league.clone());
                if league.offseason {
                    if let Some(draft_id) = self.draft_id {
                        follow_ups.push(QueryKey::DraftScores(draft_id));
                    }
                }
                follow_ups.extend(self.default_week_scores());
                epa_inputs_changed = true;
            }
            Payload::CurrentWeek(week) => {
                self.current_week = Some(*week);
                follow_ups.extend(self.default_week_scores());
                epa_inputs_changed = true;
            }
            Payload::Picks(picks) => {
                let changed = self.picks.as_ref().is_some_and(|old| old != picks);
                self.picks = Some(picks.clone());
                if changed {
                    if let Some(draft_id) = self.draft_id {
                        debug!("Picks changed, refetching available teams");
                        let key = QueryKey::AvailableTeams(draft_id);
                        self.cache.invalidate(&key);
                        follow_ups.push(key);
                    }
                }
                epa_inputs_changed = true;
            }
            _ => {}
        }

        let _ = ui_tx.send(UiUpdate::Loaded(Box::new(payload))).await;
        if epa_inputs_changed {
            self.refresh_pick_epa(ui_tx).await;
        }
        follow_ups
    }

    /// Weekly scores for the default week, once league and current week
    /// are both known and no week was chosen yet.
    fn default_week_scores(&mut self) -> Option<QueryKey> {
        if self.score_week.is_some() {
            return None;
        }
        let (Some(league), Some(current_week)) = (&self.league, &self.current_week) else {
            return None;
        };
        let week = default_score_week(league, current_week.as_ref());
        let league_id = league.league_id;
        self.score_week = Some(week);
        Some(QueryKey::WeekScores { league_id, week })
    }

    /// Publish EPA for every picked team, fetching whatever the cache lacks.
    async fn refresh_pick_epa(&mut self, ui_tx: &mpsc::Sender<UiUpdate>) {
        let (Some(league), Some(current_week), Some(picks)) =
            (&self.league, &self.current_week, &self.picks)
        else {
            return;
        };
        let year = league_metric_year(league, current_week.as_ref());
        let teams: Vec<String> = picks
            .iter()
            .filter_map(|p| p.team_picked.team())
            .map(str::to_string)
            .collect();

        let generation = self.generations.current(Family::Board);
        let mut values = HashMap::new();
        let mut to_fetch = Vec::new();
        for team in teams {
            let key = QueryKey::Epa {
                team: team.clone(),
                year,
            };
            let lookup = self.cache.lookup(&key);
            let needs_fetch = lookup.needs_fetch();
            if let Some(Payload::TeamEpa(epa)) = lookup.value() {
                values.insert(team.clone(), epa);
            }
            if needs_fetch && self.in_flight.get(&key) != Some(&generation) {
                self.in_flight.insert(key, generation);
                to_fetch.push(team);
            }
        }

        let pending = values.is_empty()
            && self
                .in_flight
                .iter()
                .any(|(key, g)| key.is_epa() && *g == generation);
        let update = if pending {
            UiUpdate::Loading(Section::PickEpa)
        } else {
            UiUpdate::Loaded(Box::new(Payload::PickEpa { year, values }))
        };
        let _ = ui_tx.send(update).await;

        if to_fetch.is_empty() {
            return;
        }
        debug!("Looking up {} EPA values for {}", to_fetch.len(), year);
        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();
        let handle = tokio::spawn(async move {
            let values = lookup_epa(source.as_ref(), &to_fetch, year).await;
            let _ = tx
                .send(Fetched::Epa {
                    generation,
                    year,
                    values,
                })
                .await;
        });
        self.track(Family::Board, handle);
    }

    /// Start a background fetch unless one is already running for this
    /// generation. Returns whether a fetch was started.
    fn spawn_fetch(&mut self, key: QueryKey) -> bool {
        let family = family_of(&key);
        let generation = self.generations.current(family);
        if self.in_flight.get(&key) == Some(&generation) {
            return false;
        }
        self.in_flight.insert(key.clone(), generation);

        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();
        let retry = self.config.retry_policy();
        let handle = tokio::spawn(async move {
            let result = fetch_payload(source.as_ref(), &key, retry)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(Fetched::Query {
                    family,
                    generation,
                    key,
                    result,
                })
                .await;
        });
        self.track(family, handle);
        true
    }

    fn track(&mut self, family: Family, handle: JoinHandle<()>) {
        self.tasks.retain(|(_, h)| !h.is_finished());
        self.tasks.push((family, handle));
    }

    /// Abort every fetch still running for `family`.
    fn abort_family(&mut self, family: Family) {
        let before = self.tasks.len();
        self.tasks.retain(|(f, handle)| {
            if *f == family {
                handle.abort();
                false
            } else {
                true
            }
        });
        let aborted = before - self.tasks.len();
        if aborted > 0 {
            debug!("Aborted {} {:?} fetches", aborted, family);
        }
        self.in_flight.retain(|key, _| family_of(key) != family);
    }

    fn finish(&mut self, key: &QueryKey, generation: u64) {
        if self.in_flight.get(key) == Some(&generation) {
            self.in_flight.remove(key);
        }
    }

    /// Handle a background fetch result.
    pub async fn handle_fetched(&mut self, fetched: Fetched, ui_tx: &mpsc::Sender<UiUpdate>) {
        match fetched {
            Fetched::Query {
                family,
                generation,
                key,
                result,
            } => {
                self.finish(&key, generation);
                if !self.generations.is_current(family, generation) {
                    debug!(
                        "Discarding stale result for {} (gen {} != {})",
                        key,
                        generation,
                        self.generations.current(family)
                    );
                    return;
                }
                match result {
                    Ok(payload) => {
                        let is_picks = matches!(payload, Payload::Picks(_));
                        self.cache.insert(key, payload.clone());
                        let follow_ups = self.apply(payload, ui_tx).await;
                        if is_picks {
                            let _ = ui_tx
                                .send(UiUpdate::Refreshed(chrono::Local::now()))
                                .await;
                        }
                        self.request_all(follow_ups, ui_tx).await;
                    }
                    Err(message) => {
                        warn!("Request {} failed: {}", key, message);
                        let _ = ui_tx
                            .send(UiUpdate::Failed {
                                section: section_of(&key),
                                message,
                            })
                            .await;
                    }
                }
            }
            Fetched::Epa {
                generation,
                year,
                values,
            } => {
                for team in values.keys() {
                    let key = QueryKey::Epa {
                        team: team.clone(),
                        year,
                    };
                    self.finish(&key, generation);
                }
                if !self.generations.is_current(Family::Board, generation) {
                    debug!("Discarding stale EPA lookup for {}", year);
                    return;
                }
                for (team, epa) in values {
                    self.cache
                        .insert(QueryKey::Epa { team, year }, Payload::TeamEpa(epa));
                }
                self.refresh_pick_epa(ui_tx).await;
            }
        }
    }

    fn start_poller(&mut self, draft_id: u32) {
        let generation = self.generations.current(Family::Board);
        let source = Arc::clone(&self.source);
        self.poller = spawn_poller(self.config.refresh_interval(), self.fetch_tx.clone(), move || {
            let source = Arc::clone(&source);
            async move {
                let key = QueryKey::Picks(draft_id);
                let result = source
                    .picks(draft_id)
                    .await
                    .map(Payload::Picks)
                    .map_err(|e| e.to_string());
                Fetched::Query {
                    family: Family::Board,
                    generation,
                    key,
                    result,
                }
            }
        });
        if self.poller.is_none() {
            info!("Auto-refresh disabled");
        }
    }

    pub fn stop_poller(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
    }
}

/// League-scoped queries every draft view needs.
fn league_keys(league_id: u32) -> [QueryKey; 6] {
    [
        QueryKey::FantasyTeams(league_id),
        QueryKey::TeamsOnWaivers(league_id),
        QueryKey::WaiverPriority(league_id),
        QueryKey::RosterWeeks(league_id),
        QueryKey::Lineups(league_id),
        QueryKey::Rankings(league_id),
    ]
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until the TUI quits or drops its command channel.
///
/// Listens on fetch results, user commands and a cache sweep timer using
/// `tokio::select!`. Opens `initial_draft` first when one is given.
pub async fn run(
    mut fetch_rx: mpsc::Receiver<Fetched>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
    initial_draft: Option<u32>,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    match initial_draft {
        Some(draft_id) => state.open_draft(draft_id, &ui_tx).await,
        None => state.browse(&ui_tx).await,
    }

    let mut gc_interval = tokio::time::interval(GC_CHECK_INTERVAL);
    // The first tick completes immediately; the first sweep happens one
    // interval in.
    gc_interval.tick().await;

    loop {
        tokio::select! {
            fetched = fetch_rx.recv() => {
                match fetched {
                    Some(fetched) => state.handle_fetched(fetched, &ui_tx).await,
                    None => {
                        info!("Fetch channel closed, shutting down");
                        break;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = gc_interval.tick() => {
                state.cache.gc();
            }
        }
    }

    state.stop_poller();
    state.abort_family(Family::Board);
    state.abort_family(Family::Scores);
    info!("Application event loop exiting");
    Ok(())
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::LoadDraft(draft_id) => state.open_draft(draft_id, ui_tx).await,
        UserCommand::Refresh => state.refresh(ui_tx).await,
        UserCommand::SelectScoreWeek(week) => state.select_score_week(week, ui_tx).await,
        UserCommand::Quit => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, CacheConfig, DraftConfig, RetryConfig};
    use fim_client::{MemoryData, MemorySource};
    use fim_core::model::{
        AvailableTeam, Draft, DraftOrderEntry, EventData, FantasyTeam, FantasyTeamRosterWeek,
        LeagueDraft, PickSelection, RosterWeekEntry, TeamEvent,
    };

    fn test_config(refresh_interval_secs: u64) -> Config {
        Config {
            api: ApiConfig {
                base_url: "http://localhost:1".into(),
                timeout_secs: 1,
            },
            draft: DraftConfig {
                draft_id: None,
                refresh_interval_secs,
            },
            cache: CacheConfig::default(),
            retry: RetryConfig {
                delay_ms: 10,
                max_attempts: Some(1),
            },
        }
    }

    fn pick(n: u32, fantasy_team_id: u32, team: Option<&str>) -> DraftPick {
        DraftPick {
            pick_number: n,
            fantasy_team_id,
            team_picked: team.map_or(PickSelection::Unpicked, |t| {
                PickSelection::Picked(t.to_string())
            }),
            events: vec![TeamEvent {
                event_key: "2025miket".into(),
                week: 2,
            }],
        }
    }

    fn sample_data() -> MemoryData {
        let mut data = MemoryData {
            current_week: Some(WeekStatus {
                year: 2025,
                week: 3,
                lineups_locked: false,
                scores_finalized: false,
                active: true,
            }),
            ..MemoryData::default()
        };
        data.drafts.insert(
            3,
            Draft {
                draft_id: 3,
                league_id: 7,
                event_key: None,
                rounds: 2,
            },
        );
        data.leagues.insert(
            7,
            League {
                league_id: 7,
                league_name: "Test League".into(),
                year: 2025,
                is_fim: true,
                offseason: false,
                weekly_starts: 2,
                team_limit: Some(2),
                team_size_limit: Some(2),
            },
        );
        data.fantasy_teams.insert(
            7,
            vec![
                FantasyTeam {
                    fantasy_team_id: 1,
                    team_name: "Alpha".into(),
                },
                FantasyTeam {
                    fantasy_team_id: 2,
                    team_name: "Beta".into(),
                },
            ],
        );
        data.draft_orders.insert(
            3,
            vec![
                DraftOrderEntry {
                    fantasy_team_id: 1,
                    draft_slot: 1,
                },
                DraftOrderEntry {
                    fantasy_team_id: 2,
                    draft_slot: 2,
                },
            ],
        );
        data.picks.insert(
            3,
            vec![pick(1, 1, Some("33")), pick(2, 2, None), pick(3, 2, None), pick(4, 1, None)],
        );
        data.available_teams.insert(
            3,
            vec![AvailableTeam {
                team_number: 254,
                name: "Cheesy Poofs".into(),
                events: Vec::new(),
                year_end_epa: Some(60.0),
            }],
        );
        data.league_drafts.insert(
            7,
            vec![LeagueDraft {
                draft_id: 3,
                rounds: 2,
                event_key: None,
            }],
        );
        data.roster_weeks.insert(
            7,
            vec![FantasyTeamRosterWeek {
                fantasy_team_id: 1,
                fantasy_team_name: "Alpha".into(),
                roster: vec![RosterWeekEntry {
                    team_key: "frc33".into(),
                    events: Vec::new(),
                }],
            }],
        );
        data.teams_on_waivers.insert(7, Vec::new());
        data.waiver_priority.insert(7, Vec::new());
        data.lineups.insert(7, Vec::new());
        data.rankings.insert(7, Vec::new());
        data.week_scores.insert((7, 3), Vec::new());
        data.week_scores.insert((7, 4), Vec::new());
        data.event_data.push(EventData {
            event_name: "Kettering".into(),
            teamcount: 40,
            maxepa: Some(50.0),
            top8epa: None,
            top24epa: None,
            avgepa: Some(20.0),
            medianepa: None,
        });
        data.epa.insert(("33".into(), 2025), 41.5);
        data
    }

    fn new_state(source: Arc<MemorySource>, refresh: u64) -> (AppState, mpsc::Receiver<Fetched>) {
        let (fetch_tx, fetch_rx) = mpsc::channel(FETCH_CHANNEL_CAPACITY);
        (AppState::new(test_config(refresh), source, fetch_tx), fetch_rx)
    }

    /// Receive updates until one matches `pred`, returning everything seen.
    async fn recv_until(
        rx: &mut mpsc::Receiver<UiUpdate>,
        pred: impl Fn(&UiUpdate) -> bool,
    ) -> Vec<UiUpdate> {
        let mut seen = Vec::new();
        loop {
            let update = tokio::time::timeout(Duration::from_secs(120), rx.recv())
                .await
                .expect("timed out waiting for update")
                .expect("ui channel closed");
            let done = pred(&update);
            seen.push(update);
            if done {
                return seen;
            }
        }
    }

    fn is_loaded(update: &UiUpdate, section: Section) -> bool {
        matches!(update, UiUpdate::Loaded(p) if p.section() == section)
    }

    fn is_pick_epa_with_values(update: &UiUpdate) -> bool {
        matches!(update, UiUpdate::Loaded(p) if matches!(p.as_ref(), Payload::PickEpa { values, .. } if !values.is_empty()))
    }

    #[test]
    fn week_scores_are_their_own_family() {
        assert_eq!(
            family_of(&QueryKey::WeekScores {
                league_id: 1,
                week: 2
            }),
            Family::Scores
        );
        assert_eq!(family_of(&QueryKey::Picks(1)), Family::Board);
        assert_eq!(section_of(&QueryKey::Epa { team: "1".into(), year: 2025 }), Section::PickEpa);
    }

    #[tokio::test]
    async fn event_loop_handles_quit_command() {
        let source = Arc::new(MemorySource::default());
        let (state, fetch_rx) = new_state(source, 0);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, _ui_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state, None));
        cmd_tx.send(UserCommand::Quit).await.unwrap();

        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn opening_draft_loads_every_section() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (state, fetch_rx) = new_state(Arc::clone(&source), 0);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);

        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state, Some(3)));

        let first = ui_rx.recv().await.unwrap();
        assert_eq!(first, UiUpdate::DraftSelected(3));

        let mut seen = Vec::new();
        while !(seen.iter().any(is_pick_epa_with_values)
            && seen.iter().any(|u| is_loaded(u, Section::WeekScores)))
        {
            seen.extend(recv_until(&mut ui_rx, |_| true).await);
        }

        let epa = seen.iter().find_map(|u| match u {
            UiUpdate::Loaded(p) => match p.as_ref() {
                Payload::PickEpa { year, values } if !values.is_empty() => {
                    Some((*year, values.clone()))
                }
                _ => None,
            },
            _ => None,
        });
        let (year, values) = epa.unwrap();
        // In season, past week 1: the league's own year.
        assert_eq!(year, 2025);
        assert_eq!(values.get("33"), Some(&Some(41.5)));

        for section in [
            Section::Draft,
            Section::League,
            Section::Picks,
            Section::CurrentWeek,
            Section::FantasyTeams,
            Section::DraftOrder,
            Section::EventData,
        ] {
            assert!(
                seen.iter().any(|u| is_loaded(u, section)),
                "missing {section:?}"
            );
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn default_score_week_follows_current_week() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (state, fetch_rx) = new_state(source, 0);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state, Some(3)));

        let seen = recv_until(&mut ui_rx, |u| is_loaded(u, Section::WeekScores)).await;
        match seen.last().unwrap() {
            UiUpdate::Loaded(p) => assert!(matches!(p.as_ref(), Payload::WeekScores { week: 3, .. })),
            other => panic!("unexpected update {other:?}"),
        }

        cmd_tx.send(UserCommand::SelectScoreWeek(4)).await.unwrap();
        let seen = recv_until(&mut ui_rx, |u| is_loaded(u, Section::WeekScores)).await;
        match seen.last().unwrap() {
            UiUpdate::Loaded(p) => assert!(matches!(p.as_ref(), Payload::WeekScores { week: 4, .. })),
            other => panic!("unexpected update {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn failed_endpoint_fails_only_its_section() {
        let source = Arc::new(MemorySource::new(sample_data()));
        source.fail("available_teams");
        let (mut state, mut fetch_rx) = new_state(Arc::clone(&source), 0);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);

        state
            .request_all([QueryKey::AvailableTeams(3), QueryKey::EventData], &ui_tx)
            .await;
        for _ in 0..2 {
            let fetched = fetch_rx.recv().await.unwrap();
            state.handle_fetched(fetched, &ui_tx).await;
        }

        let mut updates = Vec::new();
        while let Ok(update) = ui_rx.try_recv() {
            updates.push(update);
        }
        assert!(updates.iter().any(|u| matches!(
            u,
            UiUpdate::Failed { section: Section::AvailableTeams, .. }
        )));
        assert!(updates.iter().any(|u| is_loaded(u, Section::EventData)));
    }

    #[tokio::test]
    async fn superseded_results_are_discarded() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (mut state, mut fetch_rx) = new_state(Arc::clone(&source), 0);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);

        state.request_all([QueryKey::Picks(3)], &ui_tx).await;
        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::Loading(Section::Picks));

        // The user switches drafts before the fetch lands.
        state.generations.bump(Family::Board);
        let fetched = fetch_rx.recv().await.unwrap();
        state.handle_fetched(fetched, &ui_tx).await;

        assert!(ui_rx.try_recv().is_err());
        assert!(state.picks.is_none());
        assert!(state.cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn opening_another_draft_stops_pending_retries() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (mut state, _fetch_rx) = new_state(Arc::clone(&source), 0);
        state.config.retry = RetryConfig {
            delay_ms: 10,
            max_attempts: None,
        };
        let (ui_tx, _ui_rx) = mpsc::channel(1024);

        // Draft 99 does not exist, so its metadata load retries forever.
        state.open_draft(99, &ui_tx).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(source.calls("draft") > 1);

        state.open_draft(3, &ui_tx).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        let settled = source.calls("draft");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.calls("draft"), settled);
    }

    #[tokio::test]
    async fn fresh_cache_entries_skip_the_network() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (mut state, mut fetch_rx) = new_state(Arc::clone(&source), 0);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);

        state.request_all([QueryKey::EventData], &ui_tx).await;
        let fetched = fetch_rx.recv().await.unwrap();
        state.handle_fetched(fetched, &ui_tx).await;
        assert_eq!(source.calls("event_data"), 1);
        while ui_rx.try_recv().is_ok() {}

        state.request_all([QueryKey::EventData], &ui_tx).await;
        assert!(is_loaded(&ui_rx.try_recv().unwrap(), Section::EventData));
        assert!(fetch_rx.try_recv().is_err());
        assert_eq!(source.calls("event_data"), 1);
    }

    #[tokio::test]
    async fn refresh_refetches_stale_entries() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (state, fetch_rx) = new_state(Arc::clone(&source), 0);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state, Some(3)));

        recv_until(&mut ui_rx, |u| matches!(u, UiUpdate::Refreshed(_))).await;
        assert_eq!(source.calls("picks"), 1);

        cmd_tx.send(UserCommand::Refresh).await.unwrap();
        recv_until(&mut ui_rx, |u| matches!(u, UiUpdate::Refreshed(_))).await;
        assert_eq!(source.calls("picks"), 2);

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn poller_picks_up_new_picks() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (state, fetch_rx) = new_state(Arc::clone(&source), 10);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state, Some(3)));

        recv_until(&mut ui_rx, |u| matches!(u, UiUpdate::Refreshed(_))).await;
        source.update(|d| {
            if let Some(picks) = d.picks.get_mut(&3) {
                picks[1].team_picked = PickSelection::Picked("254".into());
            }
        });

        let seen = recv_until(&mut ui_rx, |u| matches!(u, UiUpdate::Refreshed(_))).await;
        let picks = seen.iter().find_map(|u| match u {
            UiUpdate::Loaded(p) => match p.as_ref() {
                Payload::Picks(picks) => Some(picks.clone()),
                _ => None,
            },
            _ => None,
        });
        assert_eq!(picks.unwrap()[1].team_picked.team(), Some("254"));
        assert_eq!(source.calls("picks"), 2);

        // The changed picks trigger an available-teams refetch: the cached
        // list is shown first, then the refetched one.
        recv_until(&mut ui_rx, |u| is_loaded(u, Section::AvailableTeams)).await;
        recv_until(&mut ui_rx, |u| is_loaded(u, Section::AvailableTeams)).await;
        assert_eq!(source.calls("available_teams"), 2);

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn draft_without_pick_rows_loads_an_empty_board() {
        let mut data = sample_data();
        data.picks.clear();
        let source = Arc::new(MemorySource::new(data));
        let (state, fetch_rx) = new_state(Arc::clone(&source), 0);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state, Some(3)));

        let seen = recv_until(&mut ui_rx, |u| {
            is_loaded(u, Section::Picks)
                || matches!(u, UiUpdate::Failed { section: Section::Picks, .. })
        })
        .await;
        match seen.last().unwrap() {
            UiUpdate::Loaded(p) => assert!(matches!(p.as_ref(), Payload::Picks(picks) if picks.is_empty())),
            other => panic!("unexpected update {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn switching_drafts_resets_state() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (mut state, _fetch_rx) = new_state(source, 0);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);
        state.score_week = Some(4);
        state.league_id = Some(7);

        state.open_draft(9, &ui_tx).await;

        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::DraftSelected(9));
        assert_eq!(state.draft_id, Some(9));
        assert_eq!(state.league_id, None);
        assert_eq!(state.score_week, None);
        assert_eq!(state.generations.current(Family::Board), 1);
        assert_eq!(state.generations.current(Family::Scores), 1);
    }

    #[tokio::test]
    async fn browsing_lists_league_drafts() {
        let source = Arc::new(MemorySource::new(sample_data()));
        let (state, fetch_rx) = new_state(Arc::clone(&source), 0);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(256);

        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state, None));

        let seen = recv_until(&mut ui_rx, |u| is_loaded(u, Section::LeagueDrafts(7))).await;
        assert!(seen.iter().any(|u| is_loaded(u, Section::Leagues)));
        let drafts = seen.iter().find_map(|u| match u {
            UiUpdate::Loaded(p) => match p.as_ref() {
                Payload::LeagueDrafts { league_id, drafts } => Some((*league_id, drafts.clone())),
                _ => None,
            },
            _ => None,
        });
        let (league_id, drafts) = drafts.unwrap();
        assert_eq!(league_id, 7);
        assert_eq!(drafts[0].draft_id, 3);
        assert_eq!(source.calls("picks"), 0);

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[test]
    fn browsing_tracks_league_queries() {
        let (fetch_tx, _fetch_rx) = mpsc::channel(FETCH_CHANNEL_CAPACITY);
        let mut state = AppState::new(test_config(0), Arc::new(MemorySource::default()), fetch_tx);
        state.browse_leagues = vec![7];
        let keys = state.tracked_keys();
        assert!(keys.contains(&QueryKey::Leagues));
        assert!(keys.contains(&QueryKey::LeagueDrafts(7)));
        assert!(!keys.iter().any(|k| matches!(k, QueryKey::Picks(_))));

        state.draft_id = Some(3);
        state.league_id = Some(7);
        let keys = state.tracked_keys();
        assert!(keys.contains(&QueryKey::RosterWeeks(7)));
        assert!(!keys.contains(&QueryKey::Leagues));
    }
}
