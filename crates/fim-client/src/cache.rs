// Keyed response cache with a freshness window.
//
// Reads report whether a value is fresh, stale (still shown while a refresh
// runs) or missing. Entries past the garbage-collection window are dropped by
// `gc` and read as missing until then.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

// ---------------------------------------------------------------------------
// QueryKey
// ---------------------------------------------------------------------------

/// One endpoint plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    CurrentWeek,
    Leagues,
    LeagueDrafts(u32),
    League(u32),
    FantasyTeams(u32),
    Draft(u32),
    DraftOrder(u32),
    Picks(u32),
    AvailableTeams(u32),
    TeamsOnWaivers(u32),
    WaiverPriority(u32),
    RosterWeeks(u32),
    Lineups(u32),
    WeekScores { league_id: u32, week: u32 },
    DraftScores(u32),
    Rankings(u32),
    EventData,
    Epa { team: String, year: i32 },
}

impl QueryKey {
    /// EPA lookups use the long freshness window.
    pub fn is_epa(&self) -> bool {
        matches!(self, QueryKey::Epa { .. })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::CurrentWeek => write!(f, "/api/currentWeek"),
            QueryKey::Leagues => write!(f, "/api/leagues"),
            QueryKey::LeagueDrafts(id) => write!(f, "/api/leagues/{id}/drafts"),
            QueryKey::League(id) => write!(f, "/api/leagues/{id}"),
            QueryKey::FantasyTeams(id) => write!(f, "/api/leagues/{id}/fantasyTeams"),
            QueryKey::Draft(id) => write!(f, "/api/drafts/{id}"),
            QueryKey::DraftOrder(id) => write!(f, "/api/drafts/{id}/draftOrder"),
            QueryKey::Picks(id) => write!(f, "/api/drafts/{id}/picks"),
            QueryKey::AvailableTeams(id) => write!(f, "/api/drafts/{id}/availableTeams"),
            QueryKey::TeamsOnWaivers(id) => write!(f, "/api/leagues/{id}/teamsOnWaivers"),
            QueryKey::WaiverPriority(id) => write!(f, "/api/leagues/{id}/waiverPriority"),
            QueryKey::RosterWeeks(id) => write!(f, "/api/leagues/{id}/rosterWeeks"),
            QueryKey::Lineups(id) => write!(f, "/api/leagues/{id}/lineups"),
            QueryKey::WeekScores { league_id, week } => {
                write!(f, "/api/leagues/{league_id}/fantasyScores/{week}")
            }
            QueryKey::DraftScores(id) => write!(f, "/api/drafts/{id}/fantasyScores"),
            QueryKey::Rankings(id) => write!(f, "/api/leagues/{id}/rankings"),
            QueryKey::EventData => write!(f, "/api/fimeventdata"),
            QueryKey::Epa { team, year } => write!(f, "/api/epa?teams={team}&year={year}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy and lookups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Freshness window for league and draft endpoints.
    pub fresh: Duration,
    /// Freshness window for EPA lookups.
    pub epa_fresh: Duration,
    /// Age after which an entry is dropped.
    pub gc: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy {
            fresh: Duration::from_secs(300),
            epa_fresh: Duration::from_secs(24 * 60 * 60),
            gc: Duration::from_secs(48 * 60 * 60),
        }
    }
}

impl CachePolicy {
    fn window(&self, key: &QueryKey) -> Duration {
        if key.is_epa() {
            self.epa_fresh
        } else {
            self.fresh
        }
    }
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Fresh(T),
    /// Present but past its freshness window: show it and refetch.
    Stale(T),
    Missing,
}

impl<T> Lookup<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Lookup::Fresh(v) | Lookup::Stale(v) => Some(v),
            Lookup::Missing => None,
        }
    }

    /// Whether the caller should start a fetch.
    pub fn needs_fetch(&self) -> bool {
        !matches!(self, Lookup::Fresh(_))
    }
}

// ---------------------------------------------------------------------------
// QueryCache
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Entry<V> {
    value: V,
    fetched_at: Instant,
    invalidated: bool,
}

#[derive(Debug)]
pub struct QueryCache<V> {
    policy: CachePolicy,
    entries: HashMap<QueryKey, Entry<V>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Store a freshly fetched value.
    pub fn insert(&mut self, key: QueryKey, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
                invalidated: false,
            },
        );
    }

    pub fn lookup(&self, key: &QueryKey) -> Lookup<V> {
        let Some(entry) = self.entries.get(key) else {
            return Lookup::Missing;
        };
        let age = entry.fetched_at.elapsed();
        if age >= self.policy.gc {
            Lookup::Missing
        } else if !entry.invalidated && age < self.policy.window(key) {
            Lookup::Fresh(entry.value.clone())
        } else {
            Lookup::Stale(entry.value.clone())
        }
    }

    /// Mark an entry stale without dropping its value.
    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    /// Drop every entry past the garbage-collection window. Returns the
    /// number removed.
    pub fn gc(&mut self) -> usize {
        let gc = self.policy.gc;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.fetched_at.elapsed() < gc);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "cache gc");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
