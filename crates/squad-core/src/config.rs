use std::time::Duration;

use crate::error::AppError;
use crate::locator::ORIGIN;

const DEFAULT_COMPETITION_PATH: &str = "/premier-league/startseite/wettbewerb/GB1";
const DEFAULT_INTERVAL_SECS: u64 = 300;
const DEFAULT_TEAM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CONCURRENT_TEAMS: usize = 4;

/// Settings for the periodic scrape pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    /// Path of the team-listing page, relative to the source origin.
    pub competition_path: String,
    /// Time between two discovery runs.
    pub interval: Duration,
    /// Upper bound for fetching and extracting one team's roster.
    pub team_timeout: Duration,
    pub max_concurrent_teams: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            competition_path: DEFAULT_COMPETITION_PATH.to_string(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            team_timeout: Duration::from_secs(DEFAULT_TEAM_TIMEOUT_SECS),
            max_concurrent_teams: DEFAULT_MAX_CONCURRENT_TEAMS,
        }
    }
}

impl ScrapeConfig {
    /// Read configuration from environment variables.
    ///
    /// - `SQUAD_COMPETITION_PATH` (defaults to the Premier League)
    /// - `SQUAD_INTERVAL_SECS` (defaults to 300)
    /// - `SQUAD_TEAM_TIMEOUT_SECS` (defaults to 60)
    /// - `SQUAD_MAX_CONCURRENT_TEAMS` (defaults to 4)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let competition_path = match lookup("SQUAD_COMPETITION_PATH") {
            None => DEFAULT_COMPETITION_PATH.to_string(),
            Some(path) if path.starts_with('/') => path,
            Some(path) => {
                return Err(AppError::ConfigError(format!(
                    "Invalid SQUAD_COMPETITION_PATH '{path}': must start with '/'"
                )));
            }
        };

        let interval = positive(&lookup, "SQUAD_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?;
        let team_timeout = positive(&lookup, "SQUAD_TEAM_TIMEOUT_SECS", DEFAULT_TEAM_TIMEOUT_SECS)?;
        let max_concurrent_teams = positive(
            &lookup,
            "SQUAD_MAX_CONCURRENT_TEAMS",
            DEFAULT_MAX_CONCURRENT_TEAMS as u64,
        )?;

        Ok(Self {
            competition_path,
            interval: Duration::from_secs(interval),
            team_timeout: Duration::from_secs(team_timeout),
            max_concurrent_teams: max_concurrent_teams as usize,
        })
    }

    /// Absolute URL of the team-listing page.
    pub fn listing_url(&self) -> String {
        format!("{ORIGIN}{}", self.competition_path)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_team_timeout(mut self, timeout: Duration) -> Self {
        self.team_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_teams(mut self, max: usize) -> Self {
        self.max_concurrent_teams = max.max(1);
        self
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let parsed: u64 = raw.parse().map_err(|_| {
        AppError::ConfigError(format!("Invalid {key} '{raw}': must be a positive integer"))
    })?;
    if parsed == 0 {
        return Err(AppError::ConfigError(format!("{key} must be at least 1")));
    }
    Ok(parsed)
}
