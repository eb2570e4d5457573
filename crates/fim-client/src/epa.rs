// Season EPA lookups for picked teams.
//
// Lookups never fail outward: a batch that errors, or a team whose value is
// not a number, comes back as `None` and is shown as "N/A".

use std::collections::HashMap;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use fim_core::links::strip_team_prefix;

use crate::api::DataSource;

/// Teams per `/api/epa` request.
pub const EPA_BATCH_SIZE: usize = 25;

/// Parse an `/api/epa` body (`{"254": 61.2, "33": null}`).
///
/// Keys lose any `frc` prefix. Non-numeric and non-finite values become
/// `None`. Only a body that is not a JSON object is an error.
pub(crate) fn parse_epa_map(body: &str) -> Result<HashMap<String, Option<f64>>, serde_json::Error> {
    let raw: HashMap<String, Value> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .map(|(team, value)| {
            let epa = value.as_f64().filter(|v| v.is_finite());
            (strip_team_prefix(&team).to_string(), epa)
        })
        .collect())
}

/// Look up EPA for `teams` in `year`, batching requests and running the
/// batches concurrently.
///
/// Every requested team appears in the result.
pub async fn lookup_epa<S>(source: &S, teams: &[String], year: i32) -> HashMap<String, Option<f64>>
where
    S: DataSource + ?Sized,
{
    let mut unique: Vec<String> = teams
        .iter()
        .map(|t| strip_team_prefix(t.trim()).to_string())
        .filter(|t| !t.is_empty())
        .collect();
    unique.sort();
    unique.dedup();

    let batches = unique.chunks(EPA_BATCH_SIZE).map(|chunk| async move {
        match source.epa(chunk, year).await {
            Ok(found) => chunk
                .iter()
                .map(|team| (team.clone(), found.get(team).copied().flatten()))
                .collect::<Vec<_>>(),
            Err(e) => {
                warn!("EPA lookup for {} teams in {year} failed: {e}", chunk.len());
                chunk.iter().map(|team| (team.clone(), None)).collect()
            }
        }
    });

    let values: HashMap<String, Option<f64>> = join_all(batches).await.into_iter().flatten().collect();
    debug!(
        year,
        requested = values.len(),
        found = values.values().filter(|v| v.is_some()).count(),
        "EPA lookup complete"
    );
    values
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
