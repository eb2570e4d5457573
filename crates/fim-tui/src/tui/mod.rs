// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding one `SectionState` per board section
// plus every piece of selection state (tab, checked weeks, score week, event
// sort). The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use fim_core::board::{
    build_grid, league_metric_year, DraftGrid, EventSort, GridError, WeekSelection,
    DRAFT_WEEK_OPTIONS, WAIVER_WEEK_OPTIONS,
};
use fim_core::model::{
    AvailableTeam, Draft, DraftOrderEntry, DraftPick, EventData, FantasyTeam,
    FantasyTeamEventScore, FantasyTeamRosterWeek, FantasyTeamWeekScore, League, LeagueDraft,
    LeagueRanking, WaiverPriority, WaiverTeam, WeekLineups, WeekStatus,
};

use crate::protocol::{Payload, Section, SectionState, TabId, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// EPA of picked teams in one season.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickEpa {
    pub year: i32,
    /// Missing key: still loading. `None`: the backend has no number.
    pub values: HashMap<String, Option<f64>>,
}

/// Weekly scores for one week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekScores {
    pub week: u32,
    pub scores: Vec<FantasyTeamWeekScore>,
}

/// TUI-local state that mirrors the fetched board for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// Draft being shown, once one is opened.
    pub draft_id: Option<u32>,
    /// League list shown while no draft is open.
    pub leagues: SectionState<Vec<League>>,
    /// Drafts per league for the league list.
    pub league_drafts: HashMap<u32, SectionState<Vec<LeagueDraft>>>,
    /// League list limited to offseason leagues.
    pub offseason_only: bool,
    pub current_week: SectionState<Option<WeekStatus>>,
    pub draft: SectionState<Draft>,
    pub league: SectionState<League>,
    pub fantasy_teams: SectionState<Vec<FantasyTeam>>,
    pub draft_order: SectionState<Vec<DraftOrderEntry>>,
    pub picks: SectionState<Vec<DraftPick>>,
    pub available: SectionState<Vec<AvailableTeam>>,
    pub pick_epa: SectionState<PickEpa>,
    pub waivers: SectionState<Vec<WaiverTeam>>,
    pub waiver_priority: SectionState<Vec<WaiverPriority>>,
    pub roster_weeks: SectionState<Vec<FantasyTeamRosterWeek>>,
    pub week_scores: SectionState<WeekScores>,
    pub lineups: SectionState<Vec<WeekLineups>>,
    pub draft_scores: SectionState<Vec<FantasyTeamEventScore>>,
    pub rankings: SectionState<Vec<LeagueRanking>>,
    pub event_data: SectionState<Vec<EventData>>,
    /// When picks last arrived from the server.
    pub last_refreshed: Option<DateTime<Local>>,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Weeks checked on the available-teams tab.
    pub draft_weeks: WeekSelection,
    /// Weeks checked on the waivers tab.
    pub waiver_weeks: WeekSelection,
    /// Index into the active tab's week options.
    pub week_cursor: usize,
    /// Week shown on the scores tab.
    pub score_week: Option<u32>,
    pub event_sort: EventSort,
    /// Index into `EventColumn::ALL`.
    pub event_column: usize,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Current filter/search text.
    pub filter_text: String,
    /// Whether the filter input is active.
    pub filter_mode: bool,
    /// Whether the quit confirmation dialog is shown.
    pub confirm_quit: bool,
    /// Whether the draft id prompt is shown.
    pub draft_input_mode: bool,
    pub draft_input: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            draft_id: None,
            leagues: SectionState::Loading,
            league_drafts: HashMap::new(),
            offseason_only: false,
            current_week: SectionState::Loading,
            draft: SectionState::Loading,
            league: SectionState::Loading,
            fantasy_teams: SectionState::Loading,
            draft_order: SectionState::Loading,
            picks: SectionState::Loading,
            available: SectionState::Loading,
            pick_epa: SectionState::Loading,
            waivers: SectionState::Loading,
            waiver_priority: SectionState::Loading,
            roster_weeks: SectionState::Loading,
            week_scores: SectionState::Loading,
            lineups: SectionState::Loading,
            draft_scores: SectionState::Loading,
            rankings: SectionState::Loading,
            event_data: SectionState::Loading,
            last_refreshed: None,
            active_tab: TabId::DraftBoard,
            draft_weeks: WeekSelection::all(&DRAFT_WEEK_OPTIONS),
            waiver_weeks: WeekSelection::all(&WAIVER_WEEK_OPTIONS),
            week_cursor: 0,
            score_week: None,
            event_sort: EventSort::default(),
            event_column: 0,
            scroll_offset: HashMap::new(),
            filter_text: String::new(),
            filter_mode: false,
            confirm_quit: false,
            draft_input_mode: false,
            draft_input: String::new(),
        }
    }
}

impl ViewState {
    /// Forget everything fetched for the previous draft. Selection state
    /// (tab, checked weeks, sort) carries over.
    pub fn reset_sections(&mut self, draft_id: u32) {
        *self = ViewState {
            draft_id: Some(draft_id),
            active_tab: self.active_tab,
            draft_weeks: std::mem::take(&mut self.draft_weeks),
            waiver_weeks: std::mem::take(&mut self.waiver_weeks),
            week_cursor: self.week_cursor,
            event_sort: self.event_sort,
            event_column: self.event_column,
            ..ViewState::default()
        };
    }

    /// The season EPA is shown for, once league and current week are known.
    pub fn metric_year(&self) -> Option<i32> {
        let league = self.league.ready()?;
        let current_week = self.current_week.ready()?;
        Some(league_metric_year(league, current_week.as_ref()))
    }

    /// The snake grid for the loaded draft, order and picks.
    pub fn grid(&self) -> Option<Result<DraftGrid, GridError>> {
        let draft = self.draft.ready()?;
        let order = self.draft_order.ready()?;
        let picks = self.picks.ready()?;
        Some(build_grid(picks, order.len(), draft.rounds as usize))
    }

    /// Week options the left/right keys move over on the active tab.
    pub fn week_options(&self) -> &'static [u32] {
        match self.active_tab {
            TabId::Waivers => &WAIVER_WEEK_OPTIONS,
            _ => &DRAFT_WEEK_OPTIONS,
        }
    }

    pub fn scroll(&self, widget: &str) -> usize {
        self.scroll_offset.get(widget).copied().unwrap_or(0)
    }

    fn set_failed(&mut self, section: Section, message: String) {
        match section {
            Section::Leagues => self.leagues = SectionState::Failed(message),
            Section::LeagueDrafts(id) => {
                self.league_drafts.insert(id, SectionState::Failed(message));
            }
            Section::CurrentWeek => self.current_week = SectionState::Failed(message),
            Section::Draft => self.draft = SectionState::Failed(message),
            Section::League => self.league = SectionState::Failed(message),
            Section::FantasyTeams => self.fantasy_teams = SectionState::Failed(message),
            Section::DraftOrder => self.draft_order = SectionState::Failed(message),
            Section::Picks => self.picks = SectionState::Failed(message),
            Section::AvailableTeams => self.available = SectionState::Failed(message),
            Section::PickEpa => self.pick_epa = SectionState::Failed(message),
            Section::TeamsOnWaivers => self.waivers = SectionState::Failed(message),
            Section::WaiverPriority => self.waiver_priority = SectionState::Failed(message),
            Section::RosterWeeks => self.roster_weeks = SectionState::Failed(message),
            Section::WeekScores => self.week_scores = SectionState::Failed(message),
            Section::Lineups => self.lineups = SectionState::Failed(message),
            Section::DraftScores => self.draft_scores = SectionState::Failed(message),
            Section::Rankings => self.rankings = SectionState::Failed(message),
            Section::EventData => self.event_data = SectionState::Failed(message),
        }
    }

    fn set_loading(&mut self, section: Section) {
        match section {
            Section::Leagues => self.leagues = SectionState::Loading,
            Section::LeagueDrafts(id) => {
                self.league_drafts.insert(id, SectionState::Loading);
            }
            Section::CurrentWeek => self.current_week = SectionState::Loading,
            Section::Draft => self.draft = SectionState::Loading,
            Section::League => self.league = SectionState::Loading,
            Section::FantasyTeams => self.fantasy_teams = SectionState::Loading,
            Section::DraftOrder => self.draft_order = SectionState::Loading,
            Section::Picks => self.picks = SectionState::Loading,
            Section::AvailableTeams => self.available = SectionState::Loading,
            Section::PickEpa => self.pick_epa = SectionState::Loading,
            Section::TeamsOnWaivers => self.waivers = SectionState::Loading,
            Section::WaiverPriority => self.waiver_priority = SectionState::Loading,
            Section::RosterWeeks => self.roster_weeks = SectionState::Loading,
            Section::WeekScores => self.week_scores = SectionState::Loading,
            Section::Lineups => self.lineups = SectionState::Loading,
            Section::DraftScores => self.draft_scores = SectionState::Loading,
            Section::Rankings => self.rankings = SectionState::Loading,
            Section::EventData => self.event_data = SectionState::Loading,
        }
    }

    fn apply_payload(&mut self, payload: Payload) {
        match payload {
            Payload::Leagues(leagues) => self.leagues = SectionState::Ready(leagues),
            Payload::LeagueDrafts { league_id, drafts } => {
                self.league_drafts
                    .insert(league_id, SectionState::Ready(drafts));
            }
            Payload::CurrentWeek(week) => self.current_week = SectionState::Ready(week),
            Payload::Draft(draft) => self.draft = SectionState::Ready(draft),
            Payload::League(league) => self.league = SectionState::Ready(league),
            Payload::FantasyTeams(teams) => self.fantasy_teams = SectionState::Ready(teams),
            Payload::DraftOrder(order) => self.draft_order = SectionState::Ready(order),
            Payload::Picks(picks) => self.picks = SectionState::Ready(picks),
            Payload::AvailableTeams(teams) => self.available = SectionState::Ready(teams),
            Payload::PickEpa { year, values } => {
                self.pick_epa = SectionState::Ready(PickEpa { year, values })
            }
            Payload::TeamsOnWaivers(teams) => self.waivers = SectionState::Ready(teams),
            Payload::WaiverPriority(priority) => {
                self.waiver_priority = SectionState::Ready(priority)
            }
            Payload::RosterWeeks(rosters) => self.roster_weeks = SectionState::Ready(rosters),
            Payload::WeekScores { week, scores } => {
                self.score_week = Some(week);
                self.week_scores = SectionState::Ready(WeekScores { week, scores });
            }
            Payload::Lineups(lineups) => self.lineups = SectionState::Ready(lineups),
            Payload::DraftScores(scores) => self.draft_scores = SectionState::Ready(scores),
            Payload::Rankings(rankings) => self.rankings = SectionState::Ready(rankings),
            Payload::EventData(events) => self.event_data = SectionState::Ready(events),
            // Single-team EPA only lives in the orchestrator's cache.
            Payload::TeamEpa(_) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::DraftSelected(draft_id) => state.reset_sections(draft_id),
        UiUpdate::Loading(section) => state.set_loading(section),
        UiUpdate::Loaded(payload) => state.apply_payload(*payload),
        UiUpdate::Failed { section, message } => state.set_failed(section, message),
        UiUpdate::Refreshed(at) => state.last_refreshed = Some(at),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    widgets::summary::render(frame, layout.summary, state);
    widgets::rankings::render(frame, layout.rankings, state);
    render_help_bar(frame, &layout, state);

    if state.draft_input_mode {
        widgets::prompt::render_draft_input(frame, frame.area(), &state.draft_input);
    } else if state.confirm_quit {
        widgets::prompt::render_quit_confirm(frame, frame.area());
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let area = layout.main_panel;
    if state.draft_id.is_none() {
        widgets::leagues::render(frame, area, state);
        return;
    }
    match state.active_tab {
        TabId::DraftBoard => widgets::draft_board::render(frame, area, state),
        TabId::Available => widgets::available::render(frame, area, state),
        TabId::LeagueWeeks => widgets::league_weeks::render(frame, area, state),
        TabId::Waivers => widgets::waivers::render(frame, area, state),
        TabId::Scores => widgets::scores::render(frame, area, state),
        TabId::EventData => widgets::event_data::render(frame, area, state),
        TabId::Rosters => widgets::rosters::render(frame, area, state),
    }
}

/// Key hints for the active tab.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.filter_mode {
        return " type to filter | Enter:Keep | Esc:Clear";
    }
    if state.draft_id.is_none() {
        return " q:Quit | j/k:Scroll | o:Offseason only | d:Open draft | r:Refresh";
    }
    match state.active_tab {
        TabId::DraftBoard | TabId::LeagueWeeks | TabId::Rosters => {
            " q:Quit | 1-7:Tabs | j/k:Scroll | d:Draft | r:Refresh"
        }
        TabId::Available | TabId::Waivers => {
            " q:Quit | 1-7:Tabs | h/l:Week | Space:Toggle week | /:Filter | d:Draft | r:Refresh"
        }
        TabId::Scores => " q:Quit | 1-7:Tabs | h/l:Score week | j/k:Scroll | d:Draft | r:Refresh",
        TabId::EventData => " q:Quit | 1-7:Tabs | h/l:Column | s:Sort | j/k:Scroll | r:Refresh",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::default();

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break,
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    // Mouse and resize events are ignored
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
