// Team page and avatar URLs on The Blue Alliance.

const TBA_BASE: &str = "https://www.thebluealliance.com";

/// Strip a leading `frc` from a team key (`"frc1234"` -> `"1234"`).
pub fn strip_team_prefix(team: &str) -> &str {
    team.strip_prefix("frc").unwrap_or(team)
}

/// Canonical team key with exactly one `frc` prefix.
pub fn team_key(team: &str) -> String {
    format!("frc{}", strip_team_prefix(team))
}

/// Team page for a season.
pub fn team_page_url(team: &str, year: i32) -> String {
    format!("{TBA_BASE}/team/{}/{year}", strip_team_prefix(team))
}

/// Team avatar image for a season. Not every team has one; callers hide the
/// image when the fetch fails.
pub fn avatar_url(team: &str, year: i32) -> String {
    format!("{TBA_BASE}/avatar/{year}/{}.png", team_key(team))
}
