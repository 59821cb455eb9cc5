use thiserror::Error;

use crate::models::Column;

/// Application-wide error types for squad.
#[derive(Error, Debug)]
pub enum AppError {
    /// The expected table or row container is missing from the page.
    #[error("Structure not found: {0}")]
    StructureNotFound(String),

    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request or page job timed out.
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    pub fn structure(context: impl Into<String>) -> Self {
        AppError::StructureNotFound(context.into())
    }

    /// Returns true if this error invalidates the whole page's extraction.
    pub fn is_page_fatal(&self) -> bool {
        matches!(self, AppError::StructureNotFound(_) | AppError::Timeout(_))
    }

    /// Returns true if this error is transient transport trouble.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) => true,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            _ => false,
        }
    }
}

/// A single roster row could not be turned into a record.
///
/// Always confined to its row: the batch extractor logs it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.column, .reason))]
pub struct RowInvalid {
    pub column: Option<Column>,
    pub reason: String,
}

fn describe(column: &Option<Column>, reason: &str) -> String {
    match column {
        Some(column) => format!("column {} ({column}): {reason}", column.index()),
        None => reason.to_string(),
    }
}

impl RowInvalid {
    pub fn in_column(column: Column, err: FieldError) -> Self {
        Self {
            column: Some(column),
            reason: err.to_string(),
        }
    }

    pub fn cell_count(found: usize) -> Self {
        Self {
            column: None,
            reason: format!(
                "column count mismatch: expected {} cells, found {found}",
                Column::COUNT
            ),
        }
    }
}

/// Failure inside a field parser or column handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("'{0}' is not a valid integer")]
    InvalidInteger(String),

    #[error("no '<Mon> <day>, <year>' date in '{0}'")]
    DatePatternNotFound(String),

    #[error("more than one date in '{0}'")]
    AmbiguousDate(String),

    #[error("unknown month abbreviation '{0}'")]
    UnknownMonth(String),

    #[error("{year}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("unknown market value multiplier '{0}'")]
    UnknownMultiplier(char),

    #[error("'{0}' is not a valid decimal amount")]
    InvalidDecimal(String),

    #[error("market value '{0}' is too short")]
    ValueTooShort(String),

    #[error("identifier must be positive")]
    ZeroIdentifier,

    #[error("'{0}' is out of the storable range")]
    ValueOutOfRange(String),

    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("missing attribute '{attr}' on {element}")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },

    #[error("empty value: {0}")]
    Empty(&'static str),

    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
}
