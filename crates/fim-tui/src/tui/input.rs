// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (tab switching,
// scrolling, week toggles, event sorting, filtering).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use fim_core::board::EventColumn;

use super::ViewState;
use crate::protocol::{TabId, UserCommand};

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 20;

/// Longest draft id the prompt accepts.
const MAX_DRAFT_ID_DIGITS: usize = 9;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports press and release on some platforms
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }
    if view_state.draft_input_mode {
        return handle_draft_input(key_event, view_state);
    }
    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        // Tab switching
        KeyCode::Char(c @ '1'..='7') => {
            let idx = (c as usize) - ('1' as usize);
            switch_tab(view_state, TabId::ALL[idx]);
            None
        }
        KeyCode::Tab => {
            switch_tab(view_state, view_state.active_tab.next());
            None
        }
        KeyCode::BackTab => {
            switch_tab(view_state, view_state.active_tab.prev());
            None
        }

        // Scrolling (main panel)
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }

        // Week cursor, score week or event column, depending on the tab
        KeyCode::Left | KeyCode::Char('h') => move_horizontal(view_state, -1),
        KeyCode::Right | KeyCode::Char('l') => move_horizontal(view_state, 1),

        KeyCode::Char(' ') => {
            toggle_week(view_state);
            None
        }

        KeyCode::Char('s') | KeyCode::Enter => {
            if view_state.active_tab == TabId::EventData {
                let column = EventColumn::ALL[view_state.event_column % EventColumn::ALL.len()];
                view_state.event_sort.request(column);
            }
            None
        }

        // Filter mode entry: only on the team lists
        KeyCode::Char('/') => {
            if matches!(view_state.active_tab, TabId::Available | TabId::Waivers) {
                view_state.filter_mode = true;
            }
            None
        }
        KeyCode::Esc => {
            view_state.filter_text.clear();
            None
        }

        KeyCode::Char('d') => {
            view_state.draft_input_mode = true;
            view_state.draft_input.clear();
            None
        }
        KeyCode::Char('o') if view_state.draft_id.is_none() => {
            view_state.offseason_only = !view_state.offseason_only;
            view_state.scroll_offset.remove("leagues");
            None
        }
        KeyCode::Char('r') => Some(UserCommand::Refresh),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Digits build the id, Enter opens it, Esc cancels.
fn handle_draft_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.draft_input_mode = false;
            view_state.draft_input.clear();
            None
        }
        KeyCode::Enter => {
            let parsed = view_state.draft_input.parse::<u32>().ok().filter(|id| *id > 0);
            let Some(draft_id) = parsed else {
                // Keep the prompt open on an empty or invalid id
                return None;
            };
            view_state.draft_input_mode = false;
            view_state.draft_input.clear();
            Some(UserCommand::LoadDraft(draft_id))
        }
        KeyCode::Backspace => {
            view_state.draft_input.pop();
            None
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if view_state.draft_input.len() < MAX_DRAFT_ID_DIGITS {
                view_state.draft_input.push(c);
            }
            None
        }
        _ => None,
    }
}

/// Printable characters extend the filter, Enter keeps it, Esc clears it.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
            None
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
            None
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            None
        }
        _ => None,
    }
}

fn switch_tab(view_state: &mut ViewState, tab: TabId) {
    view_state.active_tab = tab;
    let options = view_state.week_options().len();
    view_state.week_cursor = view_state.week_cursor.min(options.saturating_sub(1));
}

fn move_horizontal(view_state: &mut ViewState, delta: isize) -> Option<UserCommand> {
    match view_state.active_tab {
        TabId::Scores => step_score_week(view_state, delta),
        TabId::EventData => {
            view_state.event_column = step(view_state.event_column, delta, EventColumn::ALL.len());
            None
        }
        _ => {
            let options = view_state.week_options().len();
            view_state.week_cursor = step(view_state.week_cursor, delta, options);
            None
        }
    }
}

/// Move within `0..len`, clamping at both ends.
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// Ask for the neighbouring score week. Weeks run from 1 to the number of
/// weeks with lineups.
fn step_score_week(view_state: &mut ViewState, delta: isize) -> Option<UserCommand> {
    let current = view_state.score_week?;
    let last = view_state
        .lineups
        .ready()
        .map(|weeks| weeks.len() as u32)
        .unwrap_or(current)
        .max(1);
    let next = if delta < 0 {
        current.saturating_sub(1).max(1)
    } else {
        (current + 1).min(last)
    };
    if next == current {
        return None;
    }
    view_state.score_week = Some(next);
    Some(UserCommand::SelectScoreWeek(next))
}

fn toggle_week(view_state: &mut ViewState) {
    let options = view_state.week_options();
    let Some(&week) = options.get(view_state.week_cursor) else {
        return;
    };
    match view_state.active_tab {
        TabId::Available => view_state.draft_weeks.toggle(week),
        TabId::Waivers => view_state.waiver_weeks.toggle(week),
        _ => {}
    }
}

/// Scroll key for the active tab.
pub fn active_widget_key(view_state: &ViewState) -> &'static str {
    if view_state.draft_id.is_none() {
        return "leagues";
    }
    match view_state.active_tab {
        TabId::DraftBoard => "draft_board",
        TabId::Available => "available",
        TabId::LeagueWeeks => "league_weeks",
        TabId::Waivers => "waivers",
        TabId::Scores => "scores",
        TabId::EventData => "event_data",
        TabId::Rosters => "rosters",
    }
}

fn scroll_up(view_state: &mut ViewState, lines: usize) {
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_add(lines);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
