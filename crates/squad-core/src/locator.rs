//! Finds the roster and team-listing rows in a parsed page.
//!
//! An absent container or an empty row set means the source layout changed,
//! so both lookups fail with [`AppError::StructureNotFound`] instead of
//! returning an empty list.

use crate::error::AppError;
use crate::markup::MarkupNode;

/// Origin every relative link on the source pages is joined to.
pub const ORIGIN: &str = "https://www.transfermarkt.com";

const ROSTER_TABLE: &str = "#yw1 table.items > tbody";
const ROSTER_ROW_CLASSES: [&str; 2] = ["odd", "even"];

const TEAMS_TABLE: &str = "#yw1 > table > tbody";
const TEAM_ROWS: &str = "td.hauptlink.no-border-links";

/// Data rows of the roster table, in document order.
///
/// Only direct `tr` children of the table body styled `odd`/`even` count.
pub fn locate_roster_rows<N: MarkupNode>(document: &N) -> Result<Vec<N>, AppError> {
    let table = document
        .find_first(ROSTER_TABLE)
        .map_err(|e| AppError::structure(e.to_string()))?
        .ok_or_else(|| AppError::structure("roster table not found"))?;

    let rows: Vec<N> = table
        .children()
        .into_iter()
        .filter(|row| {
            row.tag() == "tr" && ROSTER_ROW_CLASSES.iter().any(|class| row.has_class(class))
        })
        .collect();

    if rows.is_empty() {
        return Err(AppError::structure("roster table has no player rows"));
    }
    Ok(rows)
}

/// Team cells of the team-listing table, in document order.
pub fn locate_team_rows<N: MarkupNode>(document: &N) -> Result<Vec<N>, AppError> {
    let table = document
        .find_first(TEAMS_TABLE)
        .map_err(|e| AppError::structure(e.to_string()))?
        .ok_or_else(|| AppError::structure("teams table not found"))?;

    let rows = table
        .find_all(TEAM_ROWS)
        .map_err(|e| AppError::structure(e.to_string()))?;

    if rows.is_empty() {
        return Err(AppError::structure("teams table has no team rows"));
    }
    Ok(rows)
}
