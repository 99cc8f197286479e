//! Houston Health Department pollen bulletin scraper.
//!
//! Bulletins are hand-published HTML pages with a date-derived slug,
//! Monday through Friday only. The publisher regularly mistypes the
//! slug, so fetching walks a short ladder of candidate URLs before
//! giving up.

use chrono::{Datelike, NaiveDate, Weekday};
use scraper::{Html, Selector};

use display::model::{PollenLevel, PollenLevels};

use crate::providers::{http_client, ProviderError};

const BASE_URL: &str = "https://www.houstonhealth.org/services/pollen-mold";
const SLUG_BASE: &str = "houston-pollen-mold-count";

pub enum PageResponse {
    Found(String),
    Missing,
}

/// Page retrieval seam, swappable for tests.
pub trait FetchPage {
    fn fetch(&self, url: &str) -> Result<PageResponse, ProviderError>;
}

pub struct HttpFetcher;

impl FetchPage for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<PageResponse, ProviderError> {
        let response = http_client()?.get(url).send()?;
        if response.status().as_u16() == 404 {
            return Ok(PageResponse::Missing);
        }
        Ok(PageResponse::Found(response.error_for_status()?.text()?))
    }
}

/// Bulletins are not published on weekends; fall back to Friday's.
fn bulletin_day(today: NaiveDate) -> NaiveDate {
    let back = match today.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };
    today - chrono::Duration::days(back)
}

fn slug(date: NaiveDate) -> String {
    format!("{SLUG_BASE}-{}", date.format("%A-%B-%-d-%Y")).to_lowercase()
}

/// The second hyphen between day number and year is the one the
/// publisher most often drops.
fn fuse_last_hyphen(slug: &str) -> String {
    match slug.rfind('-') {
        Some(idx) => format!("{}{}", &slug[..idx], &slug[idx + 1..]),
        None => slug.to_string(),
    }
}

/// Candidate URLs in the order the publisher's mistakes are likely:
/// today's slug, yesterday's, then both with the final hyphen fused.
pub fn candidate_urls(today: NaiveDate) -> Vec<String> {
    let current = slug(bulletin_day(today));
    let previous = slug(today - chrono::Duration::days(1));
    [
        current.clone(),
        previous.clone(),
        fuse_last_hyphen(&current),
        fuse_last_hyphen(&previous),
    ]
    .iter()
    .map(|s| format!("{BASE_URL}/{s}"))
    .collect()
}

pub fn fetch_levels(
    fetcher: &impl FetchPage,
    today: NaiveDate,
) -> Result<PollenLevels, ProviderError> {
    for url in candidate_urls(today) {
        match fetcher.fetch(&url)? {
            PageResponse::Found(html) => return parse_page(&html),
            PageResponse::Missing => log::info!("no pollen bulletin at {url}"),
        }
    }
    Err(ProviderError::BulletinMissing)
}

/// Scrape the centered count paragraphs. Each reads like
/// "TREE POLLEN Low (traces ...)"; the severity is the third token,
/// and a following "heavy" marker promotes it to extremely heavy.
pub fn parse_page(html: &str) -> Result<PollenLevels, ProviderError> {
    let document = Html::parse_document(html);
    let paragraphs = Selector::parse("p.text-align-center").expect("valid selector");

    let mut levels = PollenLevels::default();
    let mut matched = false;
    for paragraph in document.select(&paragraphs) {
        let text = paragraph.text().collect::<String>();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }
        let level = match tokens.get(3) {
            Some(next) if next.eq_ignore_ascii_case("heavy") => PollenLevel::ExtremelyHeavy,
            _ => PollenLevel::parse(tokens[2]),
        };
        match (
            tokens[0].to_uppercase().as_str(),
            tokens[1].to_uppercase().as_str(),
        ) {
            ("TREE", "POLLEN") => levels.tree = level,
            ("WEED", "POLLEN") => levels.weed = level,
            ("GRASS", "POLLEN") => levels.grass = level,
            ("MOLD", "SPORES") => levels.mold = level,
            _ => continue,
        }
        matched = true;
    }

    if matched {
        Ok(levels)
    } else {
        Err(ProviderError::UnexpectedPage)
    }
}
