//! Drives the row extractor over a whole page.
//!
//! Only table location can fail the page. Row failures are folded into the
//! failure log and the batch carries on with the next row.

use crate::error::AppError;
use crate::locator::{ORIGIN, locate_roster_rows, locate_team_rows};
use crate::markup::{HtmlPage, MarkupNode};
use crate::models::{RosterExtraction, RowFailure, TeamReference};
use crate::row::extract_player_row;

/// Extracts every player row of a roster page.
///
/// Records and failures keep document order. Fails only when the roster
/// table cannot be located.
pub fn extract_roster<N: MarkupNode>(
    document: &N,
    team_name: &str,
) -> Result<RosterExtraction, AppError> {
    let rows = locate_roster_rows(document)?;
    let mut extraction = RosterExtraction::default();

    for (row_index, row) in rows.iter().enumerate() {
        match extract_player_row(&row.children(), team_name) {
            Ok(record) => extraction.records.push(record),
            Err(invalid) => {
                tracing::warn!(
                    team = %team_name,
                    row_index,
                    reason = %invalid,
                    "Skipping roster row"
                );
                extraction.failures.push(RowFailure {
                    row_index,
                    reason: invalid.to_string(),
                    column: invalid.column.map(|c| c.index()),
                });
            }
        }
    }

    tracing::debug!(
        team = %team_name,
        rows = extraction.row_count(),
        records = extraction.records.len(),
        failures = extraction.failures.len(),
        "Roster extracted"
    );
    Ok(extraction)
}

/// Extracts the teams of a team-listing page.
///
/// Each team cell links to the team page through its first child, whose
/// `title` is the team name. A cell without a usable link means the layout
/// changed and fails the page.
pub fn extract_teams<N: MarkupNode>(document: &N) -> Result<Vec<TeamReference>, AppError> {
    let rows = locate_team_rows(document)?;

    let teams = rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let link = row
                .children()
                .into_iter()
                .next()
                .ok_or_else(|| AppError::structure(format!("team row {row_index} has no link")))?;
            let attr = |name: &str| {
                link.attr(name)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::structure(format!("team row {row_index} link has no {name}"))
                    })
            };

            let team_name = attr("title")?;
            let href = attr("href")?;
            Ok(TeamReference {
                team_name,
                url: format!("{ORIGIN}{href}"),
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    tracing::debug!(teams = teams.len(), "Teams extracted");
    Ok(teams)
}

/// Parses `html` and extracts its roster.
///
/// The parsed tree never leaves this call, so async callers can use it
/// between await points.
pub fn extract_roster_html(html: &str, team_name: &str) -> Result<RosterExtraction, AppError> {
    let page = HtmlPage::parse(html);
    extract_roster(&page.root(), team_name)
}

/// Parses `html` and extracts its team listing.
pub fn extract_teams_html(html: &str) -> Result<Vec<TeamReference>, AppError> {
    let page = HtmlPage::parse(html);
    extract_teams(&page.root())
}
