// HTTP client for the read-only league API.
//
// Every endpoint is a plain `GET` returning JSON. `DataSource` is the seam the
// app orchestrator talks to, so tests can swap the network for an in-memory
// source.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use fim_core::model::{
    AvailableTeam, Draft, DraftOrderEntry, DraftPick, EventData, FantasyTeam,
    FantasyTeamEventScore, FantasyTeamRosterWeek, FantasyTeamWeekScore, League,
    LeagueDraft, LeagueRanking, WaiverPriority, WaiverTeam, WeekLineups, WeekStatus,
};

use crate::epa::parse_epa_map;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} not found")]
    NotFound { url: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// DataSource
// ---------------------------------------------------------------------------

/// Everything the board reads from the backend.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// The active competition week, or `None` when no week is active.
    async fn current_week(&self) -> Result<Option<WeekStatus>, ApiError>;
    async fn leagues(&self) -> Result<Vec<League>, ApiError>;
    async fn league(&self, league_id: u32) -> Result<League, ApiError>;
    async fn fantasy_teams(&self, league_id: u32) -> Result<Vec<FantasyTeam>, ApiError>;
    async fn league_drafts(&self, league_id: u32) -> Result<Vec<LeagueDraft>, ApiError>;
    async fn draft(&self, draft_id: u32) -> Result<Draft, ApiError>;
    async fn draft_order(&self, draft_id: u32) -> Result<Vec<DraftOrderEntry>, ApiError>;
    /// Pick rows for a draft. Empty until the rows are generated.
    async fn picks(&self, draft_id: u32) -> Result<Vec<DraftPick>, ApiError>;
    async fn available_teams(&self, draft_id: u32) -> Result<Vec<AvailableTeam>, ApiError>;
    async fn teams_on_waivers(&self, league_id: u32) -> Result<Vec<WaiverTeam>, ApiError>;
    async fn waiver_priority(&self, league_id: u32) -> Result<Vec<WaiverPriority>, ApiError>;
    async fn roster_weeks(&self, league_id: u32) -> Result<Vec<FantasyTeamRosterWeek>, ApiError>;
    async fn lineups(&self, league_id: u32) -> Result<Vec<WeekLineups>, ApiError>;
    async fn week_scores(
        &self,
        league_id: u32,
        week: u32,
    ) -> Result<Vec<FantasyTeamWeekScore>, ApiError>;
    async fn draft_scores(&self, draft_id: u32) -> Result<Vec<FantasyTeamEventScore>, ApiError>;
    async fn rankings(&self, league_id: u32) -> Result<Vec<LeagueRanking>, ApiError>;
    async fn event_data(&self) -> Result<Vec<EventData>, ApiError>;
    /// Season EPA for each requested team. Teams the backend has no number
    /// for map to `None`.
    async fn epa(
        &self,
        teams: &[String],
        year: i32,
    ) -> Result<HashMap<String, Option<f64>>, ApiError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// `reqwest`-backed [`DataSource`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://fantasy.example.org`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { url });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| ApiError::Transport { url, source })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.get_text(path, &[]).await?;
        decode(&self.url(path), &body)
    }
}

/// Decode a JSON body, tagging failures with the request URL.
pub(crate) fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

#[async_trait]
impl DataSource for ApiClient {
    async fn current_week(&self) -> Result<Option<WeekStatus>, ApiError> {
        match self.get_json("/api/currentWeek").await {
            Ok(week) => Ok(Some(week)),
            Err(ApiError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn leagues(&self) -> Result<Vec<League>, ApiError> {
        self.get_json("/api/leagues").await
    }

    async fn league(&self, league_id: u32) -> Result<League, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}")).await
    }

    async fn fantasy_teams(&self, league_id: u32) -> Result<Vec<FantasyTeam>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/fantasyTeams"))
            .await
    }

    async fn league_drafts(&self, league_id: u32) -> Result<Vec<LeagueDraft>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/drafts")).await
    }

    async fn draft(&self, draft_id: u32) -> Result<Draft, ApiError> {
        self.get_json(&format!("/api/drafts/{draft_id}")).await
    }

    async fn draft_order(&self, draft_id: u32) -> Result<Vec<DraftOrderEntry>, ApiError> {
        self.get_json(&format!("/api/drafts/{draft_id}/draftOrder"))
            .await
    }

    async fn picks(&self, draft_id: u32) -> Result<Vec<DraftPick>, ApiError> {
        match self.get_json(&format!("/api/drafts/{draft_id}/picks")).await {
            Ok(picks) => Ok(picks),
            Err(ApiError::NotFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn available_teams(&self, draft_id: u32) -> Result<Vec<AvailableTeam>, ApiError> {
        self.get_json(&format!("/api/drafts/{draft_id}/availableTeams"))
            .await
    }

    async fn teams_on_waivers(&self, league_id: u32) -> Result<Vec<WaiverTeam>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/teamsOnWaivers"))
            .await
    }

    async fn waiver_priority(&self, league_id: u32) -> Result<Vec<WaiverPriority>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/waiverPriority"))
            .await
    }

    async fn roster_weeks(&self, league_id: u32) -> Result<Vec<FantasyTeamRosterWeek>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/rosterWeeks"))
            .await
    }

    async fn lineups(&self, league_id: u32) -> Result<Vec<WeekLineups>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/lineups"))
            .await
    }

    async fn week_scores(
        &self,
        league_id: u32,
        week: u32,
    ) -> Result<Vec<FantasyTeamWeekScore>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/fantasyScores/{week}"))
            .await
    }

    async fn draft_scores(&self, draft_id: u32) -> Result<Vec<FantasyTeamEventScore>, ApiError> {
        self.get_json(&format!("/api/drafts/{draft_id}/fantasyScores"))
            .await
    }

    async fn rankings(&self, league_id: u32) -> Result<Vec<LeagueRanking>, ApiError> {
        self.get_json(&format!("/api/leagues/{league_id}/rankings"))
            .await
    }

    async fn event_data(&self) -> Result<Vec<EventData>, ApiError> {
        self.get_json("/api/fimeventdata").await
    }

    async fn epa(
        &self,
        teams: &[String],
        year: i32,
    ) -> Result<HashMap<String, Option<f64>>, ApiError> {
        if teams.is_empty() {
            return Ok(HashMap::new());
        }
        let query = [("teams", teams.join(",")), ("year", year.to_string())];
        let body = self.get_text("/api/epa", &query).await?;
        parse_epa_map(&body).map_err(|source| ApiError::Decode {
            url: self.url("/api/epa"),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use fim_core::model::PickSelection;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return the
    /// request line the client sent.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = client("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url("/api/leagues"), "http://localhost:5000/api/leagues");
    }

    #[test]
    fn decode_error_names_url() {
        let err = decode::<Vec<u32>>("http://x/api/leagues", "{not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(err.to_string().contains("http://x/api/leagues"));
    }

    #[tokio::test]
    async fn picks_decode_sentinel_and_null_events() {
        let body = r#"[
            {"pick_number": 1, "fantasy_team_id": 10, "team_picked": "33",
             "events": [{"event_key": "2025mibel", "week": 1}]},
            {"pick_number": 2, "fantasy_team_id": 11, "team_picked": "-1", "events": null}
        ]"#;
        let (base, server) = serve_once("200 OK", body).await;
        let picks = client(&base).picks(7).await.unwrap();

        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].team_picked, PickSelection::Picked("33".into()));
        assert_eq!(picks[1].team_picked, PickSelection::Unpicked);
        assert!(picks[1].events.is_empty());

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /api/drafts/7/picks "));
    }

    #[tokio::test]
    async fn picks_not_generated_yet_are_empty() {
        let (base, server) = serve_once("404 Not Found", r#"{"error":"no picks"}"#).await;
        let picks = client(&base).picks(12).await.unwrap();
        assert!(picks.is_empty());

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /api/drafts/12/picks "));
    }

    #[tokio::test]
    async fn current_week_not_found_is_none() {
        let (base, _server) = serve_once("404 Not Found", r#"{"error":"none"}"#).await;
        let week = client(&base).current_week().await.unwrap();
        assert!(week.is_none());
    }

    #[tokio::test]
    async fn current_week_decodes() {
        let body = r#"{"year":2025,"week":3,"lineups_locked":true,"scores_finalized":false,"active":true}"#;
        let (base, _server) = serve_once("200 OK", body).await;
        let week = client(&base).current_week().await.unwrap().unwrap();
        assert_eq!(week.year, 2025);
        assert_eq!(week.week, 3);
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let (base, _server) = serve_once("500 Internal Server Error", "oops").await;
        let err = client(&base).league(3).await.unwrap_err();
        match err {
            ApiError::Status { status, url } => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/api/leagues/3"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_decode() {
        let (base, _server) = serve_once("200 OK", "[{\"draft_id\":").await;
        let err = client(&base).draft(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn epa_sends_teams_and_year() {
        let (base, server) = serve_once("200 OK", r#"{"33": 41.5, "67": null}"#).await;
        let teams = vec!["33".to_string(), "67".to_string()];
        let map = client(&base).epa(&teams, 2024).await.unwrap();
        assert_eq!(map.get("33"), Some(&Some(41.5)));
        assert_eq!(map.get("67"), Some(&None));

        let request_line = server.await.unwrap();
        assert!(request_line.contains("teams=33%2C67"));
        assert!(request_line.contains("year=2024"));
    }

    #[tokio::test]
    async fn epa_with_no_teams_skips_request() {
        let api = client("http://127.0.0.1:9");
        let map = api.epa(&[], 2025).await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_transport() {
        // Bind then drop to get a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}")).event_data().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
