// Pure draft-board logic shared by every view.

pub mod availability;
pub mod coverage;
pub mod epa_year;
pub mod events;
pub mod grid;
pub mod lineup;
pub mod rank;
pub mod waivers;

pub use availability::{
    competes_in_any, competing_weeks, filter_available, format_weeks, WeekSelection,
    DRAFT_WEEK_OPTIONS, EXCLUDED_WEEK, WAIVER_WEEK_OPTIONS,
};
pub use coverage::{coverage_status, league_week_coverage, Coverage, WeekCoverageRow};
pub use epa_year::{league_metric_year, select_metric_year};
pub use events::{EventColumn, EventSort, SortDirection};
pub use grid::{board_columns, build_grid, BoardColumn, DraftGrid, GridCell, GridError, PickSlot};
pub use lineup::{
    default_score_week, draft_score_rows, lineups_for_week, max_lineup_size, pad_to,
    DraftScoreRow,
};
pub use rank::{format_epa, rank_sort, rank_sort_in_place};
pub use waivers::{waiver_epa_year, waiver_rows, WaiverRow};
