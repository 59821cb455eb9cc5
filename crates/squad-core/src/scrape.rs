use crate::batch::{extract_roster_html, extract_teams_html};
use crate::error::AppError;
use crate::models::{PlayerRecord, RowFailure, TeamReference};
use crate::traits::{Fetcher, PlayerStore};

/// Result of scraping one team's roster page.
#[derive(Debug, Clone)]
pub struct RosterOutcome {
    pub team_name: String,
    pub records: Vec<PlayerRecord>,
    pub failures: Vec<RowFailure>,
    /// Rows written by the store (0 without a store).
    pub upserted: u64,
}

/// Orchestrates fetch → extract → persist for team listings and rosters.
///
/// Generic over the fetcher and the store, so the pipeline runs without real
/// HTTP or database access in tests.
#[derive(Clone)]
pub struct ScrapeService<F, S>
where
    F: Fetcher,
    S: PlayerStore,
{
    fetcher: F,
    store: Option<S>,
}

impl<F, S> ScrapeService<F, S>
where
    F: Fetcher,
    S: PlayerStore,
{
    /// Create a new ScrapeService without persistence.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            store: None,
        }
    }

    /// Create a new ScrapeService that upserts extracted players.
    pub fn with_store(fetcher: F, store: S) -> Self {
        Self {
            fetcher,
            store: Some(store),
        }
    }

    /// Fetch the team-listing page and extract its teams.
    pub async fn discover_teams(&self, listing_url: &str) -> Result<Vec<TeamReference>, AppError> {
        tracing::info!("Fetching team listing {}", listing_url);
        let html = self.fetcher.fetch(listing_url).await?;
        let teams = extract_teams_html(&html)?;
        tracing::info!(teams = teams.len(), "Team listing extracted");
        Ok(teams)
    }

    /// Fetch one team's roster page, extract it and persist the records.
    pub async fn scrape_team(&self, team: &TeamReference) -> Result<RosterOutcome, AppError> {
        tracing::info!(team = %team.team_name, "Fetching roster {}", team.url);
        let html = self.fetcher.fetch(&team.url).await?;
        tracing::debug!(team = %team.team_name, "Fetched {} bytes of HTML", html.len());

        let extraction = extract_roster_html(&html, &team.team_name)?;

        let upserted = match &self.store {
            Some(store) if !extraction.records.is_empty() => {
                store.upsert_players(&extraction.records).await?
            }
            _ => 0,
        };

        tracing::info!(
            team = %team.team_name,
            records = extraction.records.len(),
            failures = extraction.failures.len(),
            upserted,
            "Roster scraped"
        );

        Ok(RosterOutcome {
            team_name: team.team_name.clone(),
            records: extraction.records,
            failures: extraction.failures,
            upserted,
        })
    }
}
