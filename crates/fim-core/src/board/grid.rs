// Snake-draft pick grid.
//
// Picks arrive in overall pick order. The grid pads the missing tail with
// placeholders, cuts the sequence into one row per round, and reverses every
// second round so that column N always belongs to draft-order seat N.

use thiserror::Error;

use crate::model::{DraftOrderEntry, DraftPick, FantasyTeam};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("draft order is empty; a grid needs at least one participant")]
    NoParticipants,

    #[error("draft has zero rounds")]
    NoRounds,

    #[error("{picks} picks exceed the {slots} slots of the draft")]
    TooManyPicks { picks: usize, slots: usize },
}

/// Contents of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum PickSlot {
    /// A pick record returned by the API (its selection may still be
    /// `Unpicked` if the server pre-creates slots).
    Filled(DraftPick),
    /// No record yet for this slot.
    Placeholder,
}

impl PickSlot {
    pub fn pick(&self) -> Option<&DraftPick> {
        match self {
            PickSlot::Filled(pick) => Some(pick),
            PickSlot::Placeholder => None,
        }
    }

    /// The selected team number, if this slot has a resolved selection.
    pub fn team(&self) -> Option<&str> {
        self.pick().and_then(|p| p.team_picked.team())
    }

    pub fn is_open(&self) -> bool {
        self.team().is_none()
    }
}

/// One slot of the board with its position label.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Round number, 1-based.
    pub round: u32,
    /// Pick within the round, 1-based, in pick order (not display order).
    pub pick_in_round: u32,
    /// Overall pick number, 1-based.
    pub overall: u32,
    pub slot: PickSlot,
}

/// A draft board laid out for display: `rows[r][c]` is round `r + 1`, seat `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftGrid {
    participants: usize,
    rows: Vec<Vec<GridCell>>,
}

impl DraftGrid {
    pub fn rows(&self) -> &[Vec<GridCell>] {
        &self.rows
    }

    pub fn participant_count(&self) -> usize {
        self.participants
    }

    pub fn round_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_slots(&self) -> usize {
        self.participants * self.rows.len()
    }

    /// Number of slots holding a resolved selection.
    pub fn picked_count(&self) -> usize {
        self.cells().filter(|c| !c.slot.is_open()).count()
    }

    /// The first open slot in pick order, with the display column it sits in.
    /// `None` once the draft is complete.
    pub fn on_the_clock(&self) -> Option<(usize, &GridCell)> {
        self.rows
            .iter()
            .flat_map(|row| row.iter().enumerate())
            .filter(|(_, cell)| cell.slot.is_open())
            .min_by_key(|(_, cell)| cell.overall)
    }

    fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flatten()
    }
}

/// Build the snake-order grid for `participant_count` seats over `rounds`
/// rounds from a (possibly partial) pick sequence.
pub fn build_grid(
    picks: &[DraftPick],
    participant_count: usize,
    rounds: usize,
) -> Result<DraftGrid, GridError> {
    if participant_count == 0 {
        return Err(GridError::NoParticipants);
    }
    if rounds == 0 {
        return Err(GridError::NoRounds);
    }
    let total_slots = participant_count * rounds;
    if picks.len() > total_slots {
        return Err(GridError::TooManyPicks {
            picks: picks.len(),
            slots: total_slots,
        });
    }

    let mut slots = picks
        .iter()
        .cloned()
        .map(PickSlot::Filled)
        .chain(std::iter::repeat(PickSlot::Placeholder))
        .take(total_slots);

    let mut rows = Vec::with_capacity(rounds);
    for round_idx in 0..rounds {
        let mut row: Vec<GridCell> = (0..participant_count)
            .map(|pick_idx| GridCell {
                round: (round_idx + 1) as u32,
                pick_in_round: (pick_idx + 1) as u32,
                overall: (round_idx * participant_count + pick_idx + 1) as u32,
                slot: slots.next().unwrap_or(PickSlot::Placeholder),
            })
            .collect();
        if round_idx % 2 == 1 {
            row.reverse();
        }
        rows.push(row);
    }

    Ok(DraftGrid {
        participants: participant_count,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Board header
// ---------------------------------------------------------------------------

/// A board column heading: one draft-order seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub fantasy_team_id: u32,
    /// `None` when the fantasy team list has not loaded or lacks the team.
    pub team_name: Option<String>,
}

impl BoardColumn {
    pub fn display_name(&self) -> &str {
        self.team_name.as_deref().unwrap_or("--")
    }
}

/// Join the draft order with fantasy team names, keeping draft-order order.
pub fn board_columns(order: &[DraftOrderEntry], teams: &[FantasyTeam]) -> Vec<BoardColumn> {
    order
        .iter()
        .map(|entry| BoardColumn {
            fantasy_team_id: entry.fantasy_team_id,
            team_name: teams
                .iter()
                .find(|t| t.fantasy_team_id == entry.fantasy_team_id)
                .map(|t| t.team_name.clone()),
        })
        .collect()
}
