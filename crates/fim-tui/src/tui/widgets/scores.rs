// Scores widget.
//
// In-season leagues show the selected week's fantasy scores above that week's
// lineups, every lineup padded to the week's largest. Offseason drafts show
// each fantasy team's drafted-team scores padded to the weekly starts.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use fim_core::board::{draft_score_rows, lineups_for_week, max_lineup_size, pad_to};
use fim_core::model::{
    FantasyTeamEventScore, FantasyTeamWeekScore, ScoreBreakdown, StartedTeamScore, WeekLineups,
};

use super::ready_or_placeholder;
use crate::tui::ViewState;

const TITLE: &str = "Scores";

fn header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(league) = ready_or_placeholder(frame, area, TITLE, &state.league) else {
        return;
    };
    if league.offseason {
        render_draft_scores(frame, area, state, league.weekly_starts as usize);
    } else {
        render_week(frame, area, state);
    }
}

fn render_draft_scores(frame: &mut Frame, area: Rect, state: &ViewState, weekly_starts: usize) {
    let title = "Draft Scores";
    let Some(scores) = ready_or_placeholder(frame, area, title, &state.draft_scores) else {
        return;
    };
    let rows = draft_score_table(scores, weekly_starts);
    let starts = rows.first().map_or(weekly_starts, |r| r.len() - 3);

    let header = Row::new(
        std::iter::once("Team".to_string())
            .chain((1..=starts).map(|i| format!("Pick {i}")))
            .chain(["Total".to_string(), "Rank pts".to_string()]),
    )
    .style(header_style());
    let widths: Vec<Constraint> = std::iter::once(Constraint::Min(14))
        .chain((0..starts).map(|_| Constraint::Length(10)))
        .chain([Constraint::Length(7), Constraint::Length(9)])
        .collect();

    let table = Table::new(
        rows.into_iter()
            .skip(state.scroll("scores"))
            .map(Row::new),
        widths,
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

/// One row per fantasy team: name, each started team padded to the widest
/// card (at least `weekly_starts`), total, rank points.
pub fn draft_score_table(scores: &[FantasyTeamEventScore], weekly_starts: usize) -> Vec<Vec<String>> {
    let width = scores
        .iter()
        .map(|s| s.teams.len())
        .max()
        .unwrap_or(0)
        .max(weekly_starts);
    scores
        .iter()
        .map(|score| {
            std::iter::once(score.fantasy_team_name.clone())
                .chain(
                    draft_score_rows(&score.teams, width)
                        .into_iter()
                        .map(|row| {
                            if row.team_number.is_empty() {
                                "-".to_string()
                            } else {
                                format!("{} {:.0}", row.team_number, row.event_score)
                            }
                        }),
                )
                .chain([
                    format!("{:.0}", score.event_score),
                    format!("{:.0}", score.rank_points),
                ])
                .collect()
        })
        .collect()
}

fn render_week(frame: &mut Frame, area: Rect, state: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let week_label = state
        .score_week
        .map_or_else(|| "…".to_string(), |w| w.to_string());
    let scores_title = format!("Week {week_label} Scores");
    let scores = ready_or_placeholder(frame, chunks[0], &scores_title, &state.week_scores);
    if let Some(scores) = scores {
        let rows: Vec<Row> = scores
            .scores
            .iter()
            .map(|s| {
                Row::new(vec![
                    s.fantasy_team_name.clone(),
                    format!("{:.0}", s.weekly_score),
                    format!("{:.0}", s.rank_points),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(16),
                Constraint::Length(7),
                Constraint::Length(9),
            ],
        )
        .header(Row::new(vec!["Team", "Score", "Rank pts"]).style(header_style()))
        .block(Block::default().borders(Borders::ALL).title(scores_title));
        frame.render_widget(table, chunks[0]);
    }

    let lineups_title = format!("Week {week_label} Lineups");
    let Some(all) = ready_or_placeholder(frame, chunks[1], &lineups_title, &state.lineups) else {
        return;
    };
    let Some(week) = state.score_week.and_then(|w| lineups_for_week(all, w)) else {
        let paragraph = Paragraph::new("No lineups for this week.")
            .block(Block::default().borders(Borders::ALL).title(lineups_title));
        frame.render_widget(paragraph, chunks[1]);
        return;
    };

    let week_scores = scores.map_or(&[][..], |s| s.scores.as_slice());
    let header = Row::new(
        week.fantasy_teams
            .iter()
            .map(|l| l.fantasy_team_name.clone()),
    )
    .style(header_style());
    let widths: Vec<Constraint> = week
        .fantasy_teams
        .iter()
        .map(|_| Constraint::Min(12))
        .collect();
    let rows: Vec<Row> = lineup_table(week, week_scores)
        .into_iter()
        .skip(state.scroll("scores"))
        .map(Row::new)
        .collect();
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(lineups_title));
    frame.render_widget(table, chunks[1]);
}

/// Lineup grid for one week: a column per fantasy team, every column padded
/// to the largest lineup. Started teams show their score when the week's
/// scores list them.
pub fn lineup_table(week: &WeekLineups, scores: &[FantasyTeamWeekScore]) -> Vec<Vec<String>> {
    let height = max_lineup_size(week);
    let columns: Vec<Vec<String>> = week
        .fantasy_teams
        .iter()
        .map(|lineup| {
            let fantasy_score = scores
                .iter()
                .find(|s| s.fantasy_team_id == lineup.fantasy_team_id);
            pad_to(&lineup.teams, height)
                .into_iter()
                .map(|team| match team {
                    Some(team) => fantasy_score
                        .and_then(|s| s.teams.iter().find(|t| t.team_number == team.team_number))
                        .map_or_else(|| team.team_number.clone(), started_team_text),
                    None => String::new(),
                })
                .collect()
        })
        .collect();

    (0..height)
        .map(|row| columns.iter().map(|col| col[row].clone()).collect())
        .collect()
}

/// `33 40 (Q20 A10 E6 Aw4)`: team, weekly score and the non-zero parts.
pub fn started_team_text(team: &StartedTeamScore) -> String {
    let parts = breakdown_text(&team.breakdown);
    if parts.is_empty() {
        format!("{} {:.0}", team.team_number, team.weekly_score)
    } else {
        format!("{} {:.0} ({parts})", team.team_number, team.weekly_score)
    }
}

fn breakdown_text(b: &ScoreBreakdown) -> String {
    [
        ("Q", b.qual_points),
        ("A", b.alliance_points),
        ("E", b.elim_points),
        ("Aw", b.award_points),
        ("R", b.rookie_points),
        ("C", b.stat_correction),
    ]
    .into_iter()
    .filter(|(_, v)| *v != 0.0)
    .map(|(label, v)| format!("{label}{v:.0}"))
    .collect::<Vec<_>>()
    .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
