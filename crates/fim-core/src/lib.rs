// Library root: the typed API model and the pure board logic that turns API
// snapshots into what the draft board, waiver, and score views display.

pub mod board;
pub mod links;
pub mod model;
