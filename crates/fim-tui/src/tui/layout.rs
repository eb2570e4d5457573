// Board screen zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Main Panel (70%)         | Sidebar (30%)          |
// |                          | +- Summary (40%) -----+|
// |                          | +- Rankings (60%) ----+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas of the board.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: draft id, pick counter, last refresh, tab bar.
    pub status_bar: Rect,
    /// Active tab, or the league list before a draft is open.
    pub main_panel: Rect,
    /// Right sidebar top: league settings and who is on the clock.
    pub summary: Rect,
    /// Right sidebar bottom: league standings.
    pub rankings: Rect,
    /// Key hints for the active tab.
    pub help_bar: Rect,
}

/// Split the terminal into the board's zones.
pub fn build_layout(area: Rect) -> AppLayout {
    let [status_bar, middle, help_bar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .areas(area);

    let [main_panel, sidebar] =
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(middle);
    let [summary, rankings] =
        Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(sidebar);

    AppLayout {
        status_bar,
        main_panel,
        summary,
        rankings,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
