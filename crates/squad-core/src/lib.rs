pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod locator;
pub mod markup;
pub mod models;
pub mod parsers;
pub mod row;
pub mod scrape;
pub mod traits;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use batch::{extract_roster, extract_roster_html, extract_teams, extract_teams_html};
pub use config::ScrapeConfig;
pub use error::{AppError, FieldError, RowInvalid};
pub use models::{Column, PlayerRecord, RosterExtraction, RowFailure, TeamReference};
pub use scrape::{RosterOutcome, ScrapeService};
pub use traits::{Fetcher, NullStore, PlayerStore};
pub use worker::{RosterWorker, TracingWorkerReporter};
