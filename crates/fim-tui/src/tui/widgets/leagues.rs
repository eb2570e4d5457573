// League list shown before a draft is opened: every league with the drafts
// it holds, so the right draft id can be typed at the `d` prompt.

use std::cmp::Reverse;
use std::collections::HashMap;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use fim_core::model::{League, LeagueDraft};

use super::ready_or_placeholder;
use crate::protocol::SectionState;
use crate::tui::ViewState;

const TITLE: &str = "Leagues";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(leagues) = ready_or_placeholder(frame, area, TITLE, &state.leagues) else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "No draft selected. Press d and enter a draft id.",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];
    let entries = league_entries(leagues, &state.league_drafts, state.offseason_only);
    if entries.is_empty() {
        lines.push(Line::from(if state.offseason_only {
            "No offseason leagues found."
        } else {
            "No leagues found."
        }));
    }
    let shown = entries.len();
    for (league, drafts) in entries {
        lines.push(Line::from(Span::styled(
            league,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(drafts.into_iter().map(|d| Line::from(format!("    {d}"))));
    }

    let title = if state.offseason_only {
        format!("{TITLE} (offseason, {shown})")
    } else {
        format!("{TITLE} ({shown})")
    };
    let scroll = u16::try_from(state.scroll("leagues")).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

/// One heading per league, newest season first, with its draft lines.
/// `offseason_only` drops in-season leagues.
pub fn league_entries(
    leagues: &[League],
    drafts: &HashMap<u32, SectionState<Vec<LeagueDraft>>>,
    offseason_only: bool,
) -> Vec<(String, Vec<String>)> {
    let mut sorted: Vec<&League> = leagues
        .iter()
        .filter(|l| !offseason_only || l.offseason)
        .collect();
    sorted.sort_by(|a, b| {
        Reverse(a.year)
            .cmp(&Reverse(b.year))
            .then_with(|| a.league_name.cmp(&b.league_name))
    });
    sorted
        .into_iter()
        .map(|league| {
            let draft_lines = match drafts.get(&league.league_id) {
                None | Some(SectionState::Loading) => vec!["Loading drafts…".to_string()],
                Some(SectionState::Failed(message)) => {
                    vec![format!("Failed to load drafts: {message}")]
                }
                Some(SectionState::Ready(list)) if list.is_empty() => {
                    vec!["No drafts".to_string()]
                }
                Some(SectionState::Ready(list)) => list.iter().map(draft_line).collect(),
            };
            (league_heading(league), draft_lines)
        })
        .collect()
}

fn league_heading(league: &League) -> String {
    let mut tags = Vec::new();
    if league.is_fim {
        tags.push("FiM");
    }
    if league.offseason {
        tags.push("offseason");
    }
    if tags.is_empty() {
        format!("{} {}", league.year, league.league_name)
    } else {
        format!("{} {} [{}]", league.year, league.league_name, tags.join(", "))
    }
}

/// `Draft 3: 4 rounds (2025mitvc)`
pub fn draft_line(draft: &LeagueDraft) -> String {
    match &draft.event_key {
        Some(event) => format!("Draft {}: {} rounds ({event})", draft.draft_id, draft.rounds),
        None => format!("Draft {}: {} rounds", draft.draft_id, draft.rounds),
    }
}
