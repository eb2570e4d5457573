// Integration tests for the draft board.
//
// These run the orchestrator against the in-memory data source, feed every
// `UiUpdate` it emits into a `ViewState` exactly as the TUI loop does, drive
// it with key events through the input handler, and render frames to a test
// backend.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use fim_client::{MemoryData, MemorySource};
use fim_core::model::{
    AvailableTeam, Draft, DraftOrderEntry, DraftPick, EventData, FantasyTeam,
    FantasyTeamRosterWeek, FantasyTeamWeekScore, League, LeagueDraft, LeagueRanking, NamedEvent,
    PickSelection, RosterWeekEntry, TeamEvent, WeekStatus,
};
use fim_tui::app::{self, AppState, FETCH_CHANNEL_CAPACITY};
use fim_tui::config::{ApiConfig, CacheConfig, Config, DraftConfig, RetryConfig};
use fim_tui::protocol::{TabId, UiUpdate, UserCommand};
use fim_tui::tui::{apply_ui_update, input, render_frame, ViewState};

// ===========================================================================
// Test helpers
// ===========================================================================

fn config() -> Config {
    Config {
        api: ApiConfig {
            base_url: "http://localhost:1".into(),
            timeout_secs: 1,
        },
        draft: DraftConfig {
            draft_id: None,
            refresh_interval_secs: 0,
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
        team_picked: team.map_or(PickSelection::Unpicked, |t| PickSelection::Picked(t.into())),
        events: vec![TeamEvent {
            event_key: "2025mitvc".into(),
            week: 1,
        }],
    }
}

/// One in-season FiM league with a two-seat, two-round draft where only the
/// first pick has been made.
fn league_data() -> MemoryData {
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
    data.league_drafts.insert(
        7,
        vec![LeagueDraft {
            draft_id: 3,
            rounds: 2,
            event_key: None,
        }],
    );
    data.drafts.insert(
        3,
        Draft {
            draft_id: 3,
            league_id: 7,
            event_key: None,
            rounds: 2,
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
            events: vec![TeamEvent {
                event_key: "2025mitvc".into(),
                week: 1,
            }],
            year_end_epa: Some(60.0),
        }],
    );
    data.teams_on_waivers.insert(7, Vec::new());
    data.waiver_priority.insert(7, Vec::new());
    data.roster_weeks.insert(
        7,
        vec![FantasyTeamRosterWeek {
            fantasy_team_id: 1,
            fantasy_team_name: "Alpha".into(),
            roster: vec![RosterWeekEntry {
                team_key: "frc33".into(),
                events: vec![NamedEvent {
                    event_key: "2025mitvc".into(),
                    event_name: "Traverse City".into(),
                    week: 1,
                }],
            }],
        }],
    );
    data.lineups.insert(7, Vec::new());
    data.rankings.insert(
        7,
        vec![LeagueRanking {
            fantasy_team_id: 1,
            fantasy_team_name: "Alpha".into(),
            total_ranking_points: 12.0,
            tiebreaker: 30.5,
            weekly_scores: Vec::new(),
        }],
    );
    data.week_scores.insert(
        (7, 3),
        vec![FantasyTeamWeekScore {
            fantasy_team_id: 1,
            fantasy_team_name: "Alpha".into(),
            weekly_score: 42.0,
            rank_points: 6.0,
            week: 3,
            teams: Vec::new(),
        }],
    );
    data.event_data.push(EventData {
        event_name: "Traverse City".into(),
        teamcount: 40,
        maxepa: Some(61.0),
        top8epa: Some(50.0),
        top24epa: Some(35.0),
        avgepa: Some(24.7),
        medianepa: Some(22.0),
    });
    data.epa.insert(("33".into(), 2025), 41.5);
    data
}

struct Harness {
    view: ViewState,
    ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(source: Arc<MemorySource>, initial_draft: Option<u32>) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(FETCH_CHANNEL_CAPACITY);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, ui_rx) = mpsc::channel(256);
        let state = AppState::new(config(), source, fetch_tx);
        let handle = tokio::spawn(app::run(fetch_rx, cmd_rx, ui_tx, state, initial_draft));
        Harness {
            view: ViewState::default(),
            ui_rx,
            cmd_tx,
            handle,
        }
    }

    /// Apply updates until the view satisfies `done`.
    async fn settle(&mut self, done: impl Fn(&ViewState) -> bool) {
        while !done(&self.view) {
            let update = tokio::time::timeout(Duration::from_secs(120), self.ui_rx.recv())
                .await
                .expect("timed out waiting for the board to load")
                .expect("ui channel closed");
            apply_ui_update(&mut self.view, update);
        }
    }

    /// Feed a key through the input handler and forward any command.
    async fn press(&mut self, code: KeyCode) {
        let event = KeyEvent::new(code, KeyModifiers::NONE);
        if let Some(cmd) = input::handle_key(event, &mut self.view) {
            self.cmd_tx.send(cmd).await.unwrap();
        }
    }

    fn screen(&self) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).unwrap();
        terminal.draw(|frame| render_frame(frame, &self.view)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn quit(self) {
        self.cmd_tx.send(UserCommand::Quit).await.unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

fn board_loaded(view: &ViewState) -> bool {
    view.pick_epa.ready().is_some_and(|e| e.values.contains_key("33"))
        && view.available.ready().is_some()
        && view.week_scores.ready().is_some()
        && view.roster_weeks.ready().is_some()
        && view.rankings.ready().is_some()
        && view.event_data.ready().is_some()
        && view.fantasy_teams.ready().is_some()
}

// ===========================================================================
// End-to-end flows
// ===========================================================================

#[tokio::test]
async fn browse_leagues_then_open_a_draft_from_the_prompt() {
    let source = Arc::new(MemorySource::new(league_data()));
    let mut harness = Harness::start(Arc::clone(&source), None);

    harness
        .settle(|v| v.league_drafts.get(&7).is_some_and(|d| d.ready().is_some()))
        .await;
    let screen = harness.screen();
    assert!(screen.contains("2025 Test League [FiM]"), "{screen}");
    assert!(screen.contains("Draft 3: 2 rounds"), "{screen}");
    assert_eq!(source.calls("picks"), 0);

    harness.press(KeyCode::Char('d')).await;
    assert!(harness.view.draft_input_mode);
    harness.press(KeyCode::Char('3')).await;
    harness.press(KeyCode::Enter).await;

    harness.settle(board_loaded).await;
    assert_eq!(harness.view.draft_id, Some(3));

    let screen = harness.screen();
    assert!(screen.contains("Alpha"), "{screen}");
    assert!(screen.contains("33 41.5"), "{screen}");
    assert!(screen.contains("Beta (pick 2)"), "{screen}");

    harness.quit().await;
}

#[tokio::test]
async fn every_tab_renders_a_loaded_draft() {
    let source = Arc::new(MemorySource::new(league_data()));
    let mut harness = Harness::start(source, Some(3));
    harness.settle(board_loaded).await;

    harness.press(KeyCode::Char('2')).await;
    assert_eq!(harness.view.active_tab, TabId::Available);
    let screen = harness.screen();
    assert!(screen.contains("Cheesy Poofs"), "{screen}");

    harness.press(KeyCode::Char('5')).await;
    assert_eq!(harness.view.active_tab, TabId::Scores);
    let screen = harness.screen();
    assert!(screen.contains("Week 3 Scores"), "{screen}");

    harness.press(KeyCode::Char('6')).await;
    let screen = harness.screen();
    assert!(screen.contains("Traverse City"), "{screen}");
    assert!(screen.contains("25"), "{screen}");

    harness.press(KeyCode::Char('7')).await;
    assert_eq!(harness.view.active_tab, TabId::Rosters);
    let screen = harness.screen();
    assert!(screen.contains("Traverse City"), "{screen}");

    for tab in TabId::ALL {
        harness.view.active_tab = tab;
        harness.screen();
    }

    harness.quit().await;
}

#[tokio::test]
async fn failed_section_is_reported_without_blocking_the_rest() {
    let source = Arc::new(MemorySource::new(league_data()));
    source.fail("available_teams");
    let mut harness = Harness::start(Arc::clone(&source), Some(3));

    harness
        .settle(|v| {
            v.available.ready().is_none()
                && !v.available.is_loading()
                && v.league.ready().is_some()
                && v.draft.ready().is_some()
                && v.draft_order.ready().is_some()
                && v.picks.ready().is_some()
                && v.fantasy_teams.ready().is_some()
        })
        .await;

    harness.press(KeyCode::Char('2')).await;
    let screen = harness.screen();
    assert!(screen.contains("Failed to load"), "{screen}");

    harness.press(KeyCode::Char('1')).await;
    let screen = harness.screen();
    assert!(screen.contains("Alpha"), "{screen}");

    harness.quit().await;
}

#[tokio::test]
async fn refresh_picks_up_a_new_pick() {
    let source = Arc::new(MemorySource::new(league_data()));
    let mut harness = Harness::start(Arc::clone(&source), Some(3));
    harness.settle(board_loaded).await;

    source.update(|d| {
        if let Some(picks) = d.picks.get_mut(&3) {
            picks[1] = pick(2, 2, Some("254"));
        }
    });
    harness.press(KeyCode::Char('r')).await;
    harness
        .settle(|v| {
            v.picks
                .ready()
                .is_some_and(|p| p[1].team_picked.team() == Some("254"))
        })
        .await;
    harness
        .settle(|v| v.pick_epa.ready().is_some_and(|e| e.values.contains_key("254")))
        .await;

    let screen = harness.screen();
    assert!(screen.contains("254 N/A"), "{screen}");
    assert!(screen.contains("Beta (pick 3)"), "{screen}");

    harness.quit().await;
}
