//! Turns the five cells of one roster row into a [`PlayerRecord`].
//!
//! Each column has a fixed handler, applied left to right. A handler either
//! fills its part of a [`PlayerDraft`] or fails, and the first failure
//! abandons the whole row.

use chrono::NaiveDate;

use crate::error::{FieldError, RowInvalid};
use crate::locator::ORIGIN;
use crate::markup::MarkupNode;
use crate::models::{Column, PlayerRecord};
use crate::parsers::{
    clean_player_name, parse_date_of_birth, parse_market_value, parse_player_id,
    parse_shirt_number,
};

/// Fills the fields one column is responsible for.
pub type ColumnHandler<N> = fn(&N, &mut PlayerDraft) -> Result<(), FieldError>;

/// Handlers indexed by column position.
pub fn column_handlers<N: MarkupNode>() -> [ColumnHandler<N>; Column::COUNT] {
    [
        position_column::<N>,
        identity_column::<N>,
        date_of_birth_column::<N>,
        nationality_column::<N>,
        market_value_column::<N>,
    ]
}

/// Partially built record while the columns are being processed.
#[derive(Debug, Default, Clone)]
pub struct PlayerDraft {
    id: Option<u64>,
    name: Option<String>,
    shirt_number: Option<u32>,
    position: Option<String>,
    secondary_position: Option<String>,
    date_of_birth: Option<NaiveDate>,
    nationality: Option<String>,
    nationality_flag_url: Option<String>,
    market_value: Option<u64>,
    image_url: Option<String>,
    profile_url: Option<String>,
}

impl PlayerDraft {
    fn finish(self, team_name: &str) -> Result<PlayerRecord, RowInvalid> {
        let team_name = team_name.trim();
        if team_name.is_empty() {
            return Err(RowInvalid {
                column: None,
                reason: "team name is empty".into(),
            });
        }

        let missing = |column: Column, what: &'static str| {
            RowInvalid::in_column(column, FieldError::MissingElement(what))
        };

        let position = self
            .position
            .or(self.secondary_position)
            .ok_or_else(|| missing(Column::Position, "position"))?;

        Ok(PlayerRecord {
            id: self.id.ok_or_else(|| missing(Column::Identity, "player id"))?,
            name: self.name.ok_or_else(|| missing(Column::Identity, "player name"))?,
            team_name: team_name.to_string(),
            shirt_number: self
                .shirt_number
                .ok_or_else(|| missing(Column::Position, "shirt number"))?,
            position,
            date_of_birth: self
                .date_of_birth
                .ok_or_else(|| missing(Column::DateOfBirth, "date of birth"))?,
            nationality: self
                .nationality
                .ok_or_else(|| missing(Column::Nationality, "nationality"))?,
            nationality_flag_url: self
                .nationality_flag_url
                .ok_or_else(|| missing(Column::Nationality, "flag"))?,
            market_value: self
                .market_value
                .ok_or_else(|| missing(Column::MarketValue, "market value"))?,
            image_url: self
                .image_url
                .ok_or_else(|| missing(Column::Identity, "image"))?,
            profile_url: self
                .profile_url
                .ok_or_else(|| missing(Column::Identity, "profile link"))?,
        })
    }
}

/// Extracts one player from a roster row's cells.
///
/// Exactly [`Column::COUNT`] cells are required. Nothing partial is ever
/// returned: any anomaly yields a [`RowInvalid`] naming the column.
pub fn extract_player_row<N: MarkupNode>(
    cells: &[N],
    team_name: &str,
) -> Result<PlayerRecord, RowInvalid> {
    if cells.len() != Column::COUNT {
        return Err(RowInvalid::cell_count(cells.len()));
    }

    let mut draft = PlayerDraft::default();
    for ((column, handler), cell) in Column::ALL
        .iter()
        .zip(column_handlers::<N>())
        .zip(cells)
    {
        handler(cell, &mut draft).map_err(|e| RowInvalid::in_column(*column, e))?;
    }

    draft.finish(team_name)
}

fn non_empty(value: &str, what: &'static str) -> Result<String, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Empty(what));
    }
    Ok(value.to_string())
}

fn required_attr<N: MarkupNode>(
    node: &N,
    element: &'static str,
    attr: &'static str,
) -> Result<String, FieldError> {
    let value = node
        .attr(attr)
        .ok_or(FieldError::MissingAttribute { element, attr })?;
    non_empty(value, attr)
}

fn position_column<N: MarkupNode>(cell: &N, draft: &mut PlayerDraft) -> Result<(), FieldError> {
    draft.position = cell
        .attr("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase);

    let badge = match cell.find_first(".rn_nummer")? {
        Some(badge) => badge,
        None => cell
            .children()
            .into_iter()
            .next()
            .ok_or(FieldError::MissingElement("shirt number"))?,
    };
    draft.shirt_number = Some(parse_shirt_number(&badge.text())?);
    Ok(())
}

fn identity_column<N: MarkupNode>(cell: &N, draft: &mut PlayerDraft) -> Result<(), FieldError> {
    let table = cell
        .find_first("table")?
        .ok_or(FieldError::MissingElement("identity table"))?;
    let rows = table.find_all("tr")?;
    let first = rows
        .first()
        .ok_or(FieldError::MissingElement("identity row"))?;

    let image = first
        .find_first("img")?
        .ok_or(FieldError::MissingElement("player image"))?;
    let image_url = required_attr(&image, "player image", "data-src")?;

    let link = match first.find_first("td.hauptlink a")? {
        Some(link) => link,
        None => first
            .find_first("a")?
            .ok_or(FieldError::MissingElement("profile link"))?,
    };
    let href = required_attr(&link, "profile link", "href")?;
    let name = clean_player_name(&link.text());
    if name.is_empty() {
        return Err(FieldError::Empty("player name"));
    }

    draft.id = Some(parse_player_id(&href)?);
    draft.name = Some(name);
    draft.image_url = Some(image_url);
    draft.profile_url = Some(format!("{ORIGIN}{href}"));
    draft.secondary_position = rows
        .get(1)
        .map(|row| row.text().trim().to_string())
        .filter(|label| !label.is_empty());
    Ok(())
}

fn date_of_birth_column<N: MarkupNode>(
    cell: &N,
    draft: &mut PlayerDraft,
) -> Result<(), FieldError> {
    draft.date_of_birth = Some(parse_date_of_birth(&cell.text())?);
    Ok(())
}

fn nationality_column<N: MarkupNode>(
    cell: &N,
    draft: &mut PlayerDraft,
) -> Result<(), FieldError> {
    let flag = cell
        .find_first("img")?
        .ok_or(FieldError::MissingElement("nationality flag"))?;
    draft.nationality = Some(required_attr(&flag, "nationality flag", "title")?);
    draft.nationality_flag_url = Some(required_attr(&flag, "nationality flag", "src")?);
    Ok(())
}

fn market_value_column<N: MarkupNode>(
    cell: &N,
    draft: &mut PlayerDraft,
) -> Result<(), FieldError> {
    let link = cell
        .find_first("a")?
        .ok_or(FieldError::MissingElement("market value link"))?;
    draft.market_value = Some(parse_market_value(&link.text())?);
    Ok(())
}
