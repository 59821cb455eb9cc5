use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One player, extracted from one roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Numeric id from the final segment of the profile link.
    pub id: u64,
    pub name: String,
    /// Supplied by the caller; never parsed from the row.
    pub team_name: String,
    pub shirt_number: u32,
    pub position: String,
    pub date_of_birth: NaiveDate,
    pub nationality: String,
    pub nationality_flag_url: String,
    /// Base currency units, not the abbreviated display units.
    pub market_value: u64,
    pub image_url: String,
    pub profile_url: String,
}

/// A team found on the team-listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamReference {
    pub team_name: String,
    pub url: String,
}

/// A roster row that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// 0-based position of the row within the page.
    pub row_index: usize,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

/// Output of a roster page: records and the failure log, both in row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterExtraction {
    pub records: Vec<PlayerRecord>,
    pub failures: Vec<RowFailure>,
}

impl RosterExtraction {
    /// Number of rows the page yielded, successful or not.
    pub fn row_count(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// The five roster columns, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Position,
    Identity,
    DateOfBirth,
    Nationality,
    MarketValue,
}

impl Column {
    pub const COUNT: usize = 5;

    pub const ALL: [Column; Column::COUNT] = [
        Column::Position,
        Column::Identity,
        Column::DateOfBirth,
        Column::Nationality,
        Column::MarketValue,
    ];

    pub fn index(&self) -> usize {
        match self {
            Column::Position => 0,
            Column::Identity => 1,
            Column::DateOfBirth => 2,
            Column::Nationality => 3,
            Column::MarketValue => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Position => "position",
            Column::Identity => "identity",
            Column::DateOfBirth => "date of birth",
            Column::Nationality => "nationality",
            Column::MarketValue => "market value",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
