//! Test utilities: page fixtures and mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests. All mocks use
//! `Arc<Mutex<_>>` for interior mutability, allowing test assertions on
//! recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::locator::ORIGIN;
use crate::models::PlayerRecord;
use crate::traits::{Fetcher, PlayerStore};

// ---------------------------------------------------------------------------
// Page fixtures
// ---------------------------------------------------------------------------

/// Cell contents of one roster row, in the source page's markup.
#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub title: Option<String>,
    pub shirt: String,
    pub image: String,
    pub href: String,
    pub name: String,
    pub secondary_position: String,
    pub born: String,
    pub nationality: Option<String>,
    pub flag: String,
    pub market_value: String,
}

impl PlayerRow {
    pub fn saka() -> Self {
        Self {
            title: Some("Right Winger".into()),
            shirt: "7".into(),
            image: "https://img.a.transfermarkt.technology/portrait/medium/433177.jpg".into(),
            href: "/bukayo-saka/profil/spieler/433177".into(),
            name: "\n  Bukayo&nbsp;Saka  ".into(),
            secondary_position: "Right Winger".into(),
            born: "Sep 5, 2001 (22)".into(),
            nationality: Some("England".into()),
            flag: "https://tmssl.akamaized.net/images/flagge/tiny/189.png".into(),
            market_value: "€120.00m".into(),
        }
    }

    pub fn raya() -> Self {
        Self {
            title: Some("Goalkeeper".into()),
            shirt: "22".into(),
            image: "https://img.a.transfermarkt.technology/portrait/medium/262749.jpg".into(),
            href: "/david-raya/profil/spieler/262749".into(),
            name: "David Raya".into(),
            secondary_position: "Goalkeeper".into(),
            born: "Sep 15, 1995 (28)".into(),
            nationality: Some("Spain".into()),
            flag: "https://tmssl.akamaized.net/images/flagge/tiny/157.png".into(),
            market_value: "€35.00m".into(),
        }
    }

    pub fn nwaneri() -> Self {
        Self {
            title: Some("Attacking Midfield".into()),
            shirt: "53".into(),
            image: "https://img.a.transfermarkt.technology/portrait/medium/1019168.jpg".into(),
            href: "/ethan-nwaneri/profil/spieler/1019168".into(),
            name: "Ethan Nwaneri".into(),
            secondary_position: "Attacking Midfield".into(),
            born: "Mar 21, 2007 (16)".into(),
            nationality: Some("England".into()),
            flag: "https://tmssl.akamaized.net/images/flagge/tiny/189.png".into(),
            market_value: "€500k".into(),
        }
    }

    /// Renders an extracted record back into source markup.
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            title: Some(record.position.clone()),
            shirt: record.shirt_number.to_string(),
            image: record.image_url.clone(),
            href: record
                .profile_url
                .strip_prefix(ORIGIN)
                .unwrap_or(&record.profile_url)
                .to_string(),
            name: record.name.clone(),
            secondary_position: record.position.clone(),
            born: format!("{} (30)", record.date_of_birth.format("%b %-d, %Y")),
            nationality: Some(record.nationality.clone()),
            flag: record.nationality_flag_url.clone(),
            market_value: render_market_value(record.market_value),
        }
    }

    /// The five `<td>` cells of the row.
    pub fn render(&self) -> String {
        let title = self
            .title
            .as_ref()
            .map(|t| format!(r#" title="{t}""#))
            .unwrap_or_default();
        let nationality = self
            .nationality
            .as_ref()
            .map(|n| format!(r#" title="{n}" alt="{n}""#))
            .unwrap_or_default();

        format!(
            r#"<td class="zentriert rueckennummer"{title}><div class="rn_nummer">{shirt}</div></td><td class="posrela"><table class="inline-table"><tr><td rowspan="2"><img src="data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP" data-src="{image}" class="bilderrahmen-fixed lazy"></td><td class="hauptlink"><a href="{href}">{name}</a></td></tr><tr><td>{secondary}</td></tr></table></td><td class="zentriert">{born}</td><td class="zentriert"><img src="{flag}"{nationality} class="flaggenrahmen"></td><td class="rechts hauptlink"><a href="/marktwertverlauf">{value}</a></td>"#,
            shirt = self.shirt,
            image = self.image,
            href = self.href,
            name = self.name,
            secondary = self.secondary_position,
            born = self.born,
            flag = self.flag,
            value = self.market_value,
        )
    }
}

/// Abbreviated notation that parses back to exactly `value`.
pub fn render_market_value(value: u64) -> String {
    if value >= 1_000_000_000 && value % 10_000_000 == 0 {
        let cents = value / 10_000_000;
        format!("€{}.{:02}b", cents / 100, cents % 100)
    } else if value >= 1_000_000 && value % 10_000 == 0 {
        let cents = value / 10_000;
        format!("€{}.{:02}m", cents / 100, cents % 100)
    } else if value % 1_000 == 0 {
        format!("€{}k", value / 1_000)
    } else {
        format!("€{}.{:03}k", value / 1_000, value % 1_000)
    }
}

/// A roster page whose table body holds `rows`, styled odd/even alternately.
pub fn roster_page(rows: &[String]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            let class = if i % 2 == 0 { "odd" } else { "even" };
            format!("<tr class=\"{class}\">{cells}</tr>\n")
        })
        .collect();

    format!(
        r#"<html><head><title>Squad</title></head><body>
<div id="yw1" class="grid-view">
<table class="items">
<thead><tr><th>#</th><th>Player</th><th>Date of birth/Age</th><th>Nat.</th><th>Market value</th></tr></thead>
<tbody>
{body}</tbody>
</table>
</div>
</body></html>"#
    )
}

/// A team-listing page with one row per `(name, href)`.
pub fn team_listing_page(teams: &[(&str, &str)]) -> String {
    let body: String = teams
        .iter()
        .enumerate()
        .map(|(i, (name, href))| {
            let class = if i % 2 == 0 { "odd" } else { "even" };
            format!(
                r#"<tr class="{class}"><td class="zentriert no-border-rechts"><a title="{name}" href="{href}"><img src="/wappen/{i}.png"></a></td><td class="hauptlink no-border-links"><a title="{name}" href="{href}">{name}</a></td><td class="zentriert">25</td></tr>
"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
<div id="yw1" class="grid-view">
<table class="items">
<thead><tr><th>Club</th><th>name</th><th>Squad</th></tr></thead>
<tbody>
{body}</tbody>
</table>
</div>
</body></html>"#
    )
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum MockResponse {
    Page(String),
    Error(String),
    Hang,
}

/// Mock fetcher serving fixed pages per URL.
///
/// Unknown URLs answer with an HTTP 404 error.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: impl Into<String>) -> Self {
        self.set(url, MockResponse::Page(html.into()))
    }

    pub fn with_error(self, url: &str, message: &str) -> Self {
        self.set(url, MockResponse::Error(message.to_string()))
    }

    /// The fetch for `url` never completes.
    pub fn with_hang(self, url: &str) -> Self {
        self.set(url, MockResponse::Hang)
    }

    fn set(self, url: &str, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());
        let response = self.responses.lock().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Page(html)) => Ok(html),
            Some(MockResponse::Error(msg)) => Err(AppError::HttpError(msg)),
            Some(MockResponse::Hang) => std::future::pending().await,
            None => Err(AppError::HttpError(format!("HTTP 404 for {url}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// Mock store that records upserted players.
#[derive(Clone, Default)]
pub struct MockStore {
    pub saved: Arc<Mutex<Vec<PlayerRecord>>>,
    error: Arc<Mutex<Option<AppError>>>,
}

impl MockStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The next upsert fails with `error`.
    pub fn with_error(error: AppError) -> Self {
        Self {
            saved: Arc::default(),
            error: Arc::new(Mutex::new(Some(error))),
        }
    }
}

impl PlayerStore for MockStore {
    async fn upsert_players(&self, players: &[PlayerRecord]) -> Result<u64, AppError> {
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        self.saved.lock().unwrap().extend_from_slice(players);
        Ok(players.len() as u64)
    }
}
