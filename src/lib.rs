//! NBA rest and travel features
//!
//! Derives per-game rest days, travel distance and winner/loser oriented
//! features from a season of basketball-reference schedule rows.

pub mod data;
pub mod features;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Phase of the season a game belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "Regular Season")]
    RegularSeason,
    #[serde(rename = "Playoffs")]
    Playoffs,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::RegularSeason => write!(f, "Regular Season"),
            GameType::Playoffs => write!(f, "Playoffs"),
        }
    }
}

/// Venue role of a team within a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Visitor,
}

/// One schedule table row exactly as scraped, all cells as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGameRow {
    pub date: String,
    pub visitor: String,
    pub visitor_pts: String,
    pub home: String,
    pub home_pts: String,
    pub attendance: String,
}

impl RawGameRow {
    /// Marker the schedule pages put in the date column between the
    /// regular season and the playoffs
    pub const PLAYOFFS_MARKER: &'static str = "Playoffs";

    pub fn is_playoffs_marker(&self) -> bool {
        self.date.trim() == Self::PLAYOFFS_MARKER
    }
}

/// A raw row tagged with its season phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRow {
    pub row: RawGameRow,
    pub game_type: GameType,
}

/// A single parsed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub visitor: String,
    pub home: String,
    pub visitor_score: u16,
    pub home_score: u16,
    /// Recorded attendance, absent when the page left the cell empty
    pub attendance: Option<u32>,
    pub game_type: GameType,
}

impl GameRecord {
    /// Parse a tagged row. `position` is the row's index in the season
    /// sequence and is only used for error context.
    pub fn from_row(position: usize, tagged: &TaggedRow) -> Result<Self> {
        let row = &tagged.row;
        let date = parse_game_date(&row.date).ok_or_else(|| HoopsError::DateParse {
            row: position,
            value: row.date.clone(),
        })?;
        let visitor_score = parse_score(position, &row.visitor_pts)?;
        let home_score = parse_score(position, &row.home_pts)?;
        if visitor_score == home_score {
            return Err(HoopsError::TiedGame {
                row: position,
                score: home_score,
            });
        }

        Ok(GameRecord {
            date,
            visitor: row.visitor.trim().to_string(),
            home: row.home.trim().to_string(),
            visitor_score,
            home_score,
            attendance: parse_attendance(position, &row.attendance)?,
            game_type: tagged.game_type,
        })
    }

    /// Venue role of the team with the higher score
    pub fn winner_side(&self) -> Side {
        if self.home_score > self.visitor_score {
            Side::Home
        } else {
            Side::Visitor
        }
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home,
            Side::Visitor => &self.visitor,
        }
    }

    pub fn winner(&self) -> &str {
        self.team(self.winner_side())
    }

    pub fn loser(&self) -> &str {
        self.team(self.winner_side().opposite())
    }

    /// Absolute score difference
    pub fn margin(&self) -> u16 {
        self.home_score.abs_diff(self.visitor_score)
    }

    pub fn has_attendance(&self) -> bool {
        self.attendance.is_some()
    }
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Home => Side::Visitor,
            Side::Visitor => Side::Home,
        }
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+,\s+([A-Za-z]{3}\s+\d{1,2},\s+\d{4})$").expect("valid date regex")
    })
}

/// Parse a schedule date such as "Tue, Oct 22, 2019"
pub fn parse_game_date(text: &str) -> Option<NaiveDate> {
    let caps = date_pattern().captures(text.trim())?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%b %d, %Y").ok()
}

fn parse_score(position: usize, text: &str) -> Result<u16> {
    text.trim().parse().map_err(|_| HoopsError::ScoreParse {
        row: position,
        value: text.to_string(),
    })
}

fn parse_attendance(position: usize, text: &str) -> Result<Option<u32>> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse()
        .map(Some)
        .map_err(|_| HoopsError::AttendanceParse {
            row: position,
            value: text.to_string(),
        })
}

/// A team with its static home coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: i64,
    pub full_name: String,
    pub city: String,
    pub location: Location,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HoopsError {
    #[error("Scraper failed for {url}: {message}")]
    Scraper { url: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Row {row}: cannot parse date {value:?}")]
    DateParse { row: usize, value: String },

    #[error("Row {row}: cannot parse score {value:?}")]
    ScoreParse { row: usize, value: String },

    #[error("Row {row}: cannot parse attendance {value:?}")]
    AttendanceParse { row: usize, value: String },

    #[error("Row {row}: tied score {score}-{score}")]
    TiedGame { row: usize, score: u16 },

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Cannot geocode city: {0}")]
    Geocode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HoopsError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub season: SeasonConfig,
    pub source: SourceConfig,
    pub teams: TeamsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Season label as used by basketball-reference (2020 = 2019-20)
    pub year: u16,
    pub months: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    pub cache_dir: Option<String>,
    pub offline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    Builtin,
    Arcgis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsConfig {
    pub api_url: String,
    pub resolver: ResolverKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_path: String,
    /// Team directory CSV, reused by later builds when present
    pub teams_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            season: SeasonConfig {
                year: 2020,
                months: [
                    "october", "november", "december", "january", "february", "march", "july",
                    "august", "september",
                ]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            },
            source: SourceConfig {
                base_url: "https://www.basketball-reference.com/leagues".to_string(),
                cache_dir: None,
                offline: false,
            },
            teams: TeamsConfig {
                api_url: "https://www.balldontlie.io/api/v1/teams".to_string(),
                resolver: ResolverKind::Builtin,
            },
            output: OutputConfig {
                data_path: "data/data.csv".to_string(),
                teams_path: "data/teams.csv".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HoopsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HoopsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HoopsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
