//! basketball-reference schedule scraper
//!
//! Fetches one schedule page per month and reads its game table into raw
//! text rows. Supports caching HTML files for offline runs.

use scraper::{ElementRef, Html, Selector};
use std::path::{Path, PathBuf};

use crate::features::segment::split_playoffs;
use crate::{HoopsError, RawGameRow, Result, SourceConfig, TaggedRow};

/// Cell `data-stat` keys of the schedule table, in `RawGameRow` order
const DATE_STAT: &str = "date_game";
const VISITOR_STAT: &str = "visitor_team_name";
const VISITOR_PTS_STAT: &str = "visitor_pts";
const HOME_STAT: &str = "home_team_name";
const HOME_PTS_STAT: &str = "home_pts";
const ATTENDANCE_STAT: &str = "attendance";

/// Scraper for basketball-reference monthly schedule pages
pub struct ScheduleScraper {
    client: reqwest::blocking::Client,
    base_url: String,
    /// Optional cache directory for offline HTML files
    cache_dir: Option<PathBuf>,
    /// If true, only use cache (no network requests)
    offline_only: bool,
    max_attempts: u32,
}

impl ScheduleScraper {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("hoops-features/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(ScheduleScraper {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_dir: None,
            offline_only: false,
            max_attempts: 3,
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let mut scraper = Self::new(&config.base_url)?.offline_only(config.offline);
        if let Some(dir) = &config.cache_dir {
            scraper = scraper.with_cache(dir);
        }
        Ok(scraper)
    }

    /// Create scraper with a cache directory
    pub fn with_cache<P: AsRef<Path>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.as_ref().to_path_buf());
        self
    }

    /// Set offline-only mode (no network requests, cache must exist)
    pub fn offline_only(mut self, offline: bool) -> Self {
        self.offline_only = offline;
        self
    }

    pub fn month_url(&self, year: u16, month: &str) -> String {
        format!(
            "{}/NBA_{}_games-{}.html",
            self.base_url,
            year,
            month.to_lowercase()
        )
    }

    /// Get the cache file path for a URL
    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| {
            let filename = url
                .replace("https://", "")
                .replace("http://", "")
                .replace('/', "_")
                .replace('?', "_");
            let filename = if filename.ends_with(".html") {
                filename
            } else {
                filename + ".html"
            };
            dir.join(filename)
        })
    }

    fn load_from_cache(&self, url: &str) -> Option<String> {
        let path = self.cache_path(url)?;
        if path.exists() {
            log::debug!("Loading from cache: {}", path.display());
            std::fs::read_to_string(&path).ok()
        } else {
            None
        }
    }

    fn save_to_cache(&self, url: &str, html: &str) -> Result<()> {
        if let Some(path) = self.cache_path(url) {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, html)?;
            log::debug!("Saved to cache: {}", path.display());
        }
        Ok(())
    }

    fn fetch_html(&self, url: &str) -> Result<String> {
        if let Some(cached) = self.load_from_cache(url) {
            return Ok(cached);
        }
        if self.offline_only {
            return Err(HoopsError::Scraper {
                url: url.to_string(),
                message: "no cached page (offline mode)".to_string(),
            });
        }

        let html = with_retry(
            || {
                let response = self.client.get(url).send()?;
                if !response.status().is_success() {
                    return Err(HoopsError::Scraper {
                        url: url.to_string(),
                        message: format!("HTTP {}", response.status()),
                    });
                }
                Ok(response.text()?)
            },
            self.max_attempts,
        )?;
        if let Err(e) = self.save_to_cache(url, &html) {
            log::warn!("Failed to cache {}: {}", url, e);
        }
        Ok(html)
    }

    /// Fetch the raw rows of one month, in page order
    pub fn fetch_month(&self, year: u16, month: &str) -> Result<Vec<RawGameRow>> {
        let url = self.month_url(year, month);
        log::info!("Fetching {} {} from {}", month, year, url);
        let html = self.fetch_html(&url)?;
        parse_schedule(&html).map_err(|e| match e {
            HoopsError::Scraper { message, .. } => HoopsError::Scraper { url, message },
            other => other,
        })
    }

    /// Fetch every month, segmenting each one before concatenating
    pub fn fetch_season(&self, year: u16, months: &[String]) -> Result<Vec<TaggedRow>> {
        let mut season = Vec::new();
        for month in months {
            let rows = self.fetch_month(year, month)?;
            log::info!("  Found {} rows", rows.len());
            season.extend(split_playoffs(rows));
        }
        Ok(season)
    }
}

/// Parse the first table of a schedule page into raw rows.
///
/// The "Playoffs" divider row is kept so the segmenter can find it; other
/// header rows are skipped.
pub fn parse_schedule(html: &str) -> Result<Vec<RawGameRow>> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tbody tr").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| HoopsError::Scraper {
            url: String::new(),
            message: "no table on page".to_string(),
        })?;

    let mut rows = Vec::new();
    for tr in table.select(&row_selector) {
        let first_cell = tr
            .children()
            .filter_map(ElementRef::wrap)
            .next()
            .map(cell_text)
            .unwrap_or_default();

        if first_cell == RawGameRow::PLAYOFFS_MARKER {
            rows.push(RawGameRow {
                date: first_cell,
                ..Default::default()
            });
            continue;
        }
        if tr.value().classes().any(|c| c == "thead") {
            continue;
        }

        let date = stat_text(&tr, DATE_STAT).unwrap_or(first_cell);
        if date.is_empty() {
            continue;
        }
        rows.push(RawGameRow {
            date,
            visitor: stat_text(&tr, VISITOR_STAT).unwrap_or_default(),
            visitor_pts: stat_text(&tr, VISITOR_PTS_STAT).unwrap_or_default(),
            home: stat_text(&tr, HOME_STAT).unwrap_or_default(),
            home_pts: stat_text(&tr, HOME_PTS_STAT).unwrap_or_default(),
            attendance: stat_text(&tr, ATTENDANCE_STAT).unwrap_or_default(),
        });
    }

    Ok(rows)
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn stat_text(row: &ElementRef, stat: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[data-stat='{}']", stat)).ok()?;
    row.select(&selector).next().map(cell_text)
}

/// Retry an operation with exponential backoff
pub fn with_retry<T, F>(mut operation: F, max_attempts: u32) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(e) if attempt + 1 >= max_attempts => return Err(e),
            Err(e) => {
                log::warn!("Attempt {} failed: {}", attempt + 1, e);
                let delay = std::time::Duration::from_millis(100 * 2u64.pow(attempt));
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameType;
    use tempfile::tempdir;

    const PAGE: &str = r#"
    <html><body>
    <table id="schedule">
      <thead><tr><th data-stat="date_game">Date</th><th>Start (ET)</th></tr></thead>
      <tbody>
        <tr>
          <th data-stat="date_game"><a href="/x">Tue, Aug 11, 2020</a></th>
          <td data-stat="game_start_time">1:00p</td>
          <td data-stat="visitor_team_name"><a href="/a">Toronto Raptors</a></td>
          <td data-stat="visitor_pts">114</td>
          <td data-stat="home_team_name"><a href="/b">Milwaukee Bucks</a></td>
          <td data-stat="home_pts">106</td>
          <td data-stat="box_score_text">Box Score</td>
          <td data-stat="overtimes"></td>
          <td data-stat="attendance"></td>
        </tr>
        <tr class="thead"><th colspan="10">Playoffs</th></tr>
        <tr>
          <th data-stat="date_game">Mon, Aug 17, 2020</th>
          <td data-stat="visitor_team_name">Brooklyn Nets</td>
          <td data-stat="visitor_pts">110</td>
          <td data-stat="home_team_name">Toronto Raptors</td>
          <td data-stat="home_pts">134</td>
          <td data-stat="attendance">0</td>
        </tr>
      </tbody>
    </table>
    <table id="other"><tbody><tr><td>ignored</td></tr></tbody></table>
    </body></html>
    "#;

    const REGULAR: &str = r#"
    <table><tbody>
      <tr>
        <th data-stat="date_game">Tue, Oct 22, 2019</th>
        <td data-stat="visitor_team_name">New Orleans Pelicans</td>
        <td data-stat="visitor_pts">122</td>
        <td data-stat="home_team_name">Toronto Raptors</td>
        <td data-stat="home_pts">130</td>
        <td data-stat="attendance">20,787</td>
      </tr>
    </tbody></table>
    "#;

    #[test]
    fn test_parse_schedule() {
        let rows = parse_schedule(PAGE).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            RawGameRow {
                date: "Tue, Aug 11, 2020".to_string(),
                visitor: "Toronto Raptors".to_string(),
                visitor_pts: "114".to_string(),
                home: "Milwaukee Bucks".to_string(),
                home_pts: "106".to_string(),
                attendance: String::new(),
            }
        );
        assert!(rows[1].is_playoffs_marker());
        assert_eq!(rows[2].home, "Toronto Raptors");
        assert_eq!(rows[2].attendance, "0");
    }

    #[test]
    fn test_parse_then_segment() {
        let tagged = split_playoffs(parse_schedule(PAGE).unwrap());

        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].game_type, GameType::RegularSeason);
        assert_eq!(tagged[1].game_type, GameType::Playoffs);
    }

    #[test]
    fn test_page_without_table() {
        let err = parse_schedule("<html><body><p>nothing</p></body></html>").unwrap_err();
        assert!(matches!(err, HoopsError::Scraper { .. }));
    }

    #[test]
    fn test_offline_reads_cache() {
        let dir = tempdir().unwrap();
        let scraper = ScheduleScraper::new("https://www.basketball-reference.com/leagues/")
            .unwrap()
            .with_cache(dir.path())
            .offline_only(true);

        let url = scraper.month_url(2020, "October");
        assert_eq!(
            url,
            "https://www.basketball-reference.com/leagues/NBA_2020_games-october.html"
        );
        scraper.save_to_cache(&url, REGULAR).unwrap();

        let season = scraper
            .fetch_season(2020, &["october".to_string()])
            .unwrap();
        assert_eq!(season.len(), 1);
        assert_eq!(season[0].row.attendance, "20,787");
        assert_eq!(season[0].game_type, GameType::RegularSeason);
    }

    #[test]
    fn test_offline_without_cache_fails() {
        let dir = tempdir().unwrap();
        let scraper = ScheduleScraper::new("https://example.invalid")
            .unwrap()
            .with_cache(dir.path())
            .offline_only(true);

        let err = scraper.fetch_month(2020, "march").unwrap_err();
        assert!(matches!(err, HoopsError::Scraper { .. }));
    }

    #[test]
    fn test_with_retry_gives_up() {
        let mut calls = 0;
        let result: Result<()> = with_retry(
            || {
                calls += 1;
                Err(HoopsError::Config("boom".to_string()))
            },
            2,
        );
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_with_retry_succeeds() {
        let mut calls = 0;
        let result = with_retry(
            || {
                calls += 1;
                if calls < 2 {
                    Err(HoopsError::Config("flaky".to_string()))
                } else {
                    Ok(calls)
                }
            },
            3,
        );
        assert_eq!(result.unwrap(), 2);
    }
}
