//! Team directory: team names to static home coordinates
//!
//! The team listing comes from the balldontlie API. Cities are normalized
//! and resolved to coordinates through a `LocationResolver`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{HoopsError, Location, Result, TeamEntry};

/// Exact-value replacements applied to every team listing field before
/// geocoding. State and region names map to the principal city.
const NAME_OVERRIDES: &[(&str, &str)] = &[
    ("Utah", "Salt Lake City"),
    ("Golden State", "San Francisco"),
    ("LA", "Los Angeles"),
    ("LA Clippers", "Los Angeles Clippers"),
    ("Indiana", "Indianapolis"),
    ("Minnesota", "Minneapolis"),
];

pub fn normalize_name(value: &str) -> String {
    let trimmed = value.trim();
    NAME_OVERRIDES
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// One team as listed by the balldontlie API
#[derive(Debug, Clone, Deserialize)]
pub struct ListedTeam {
    pub id: i64,
    #[serde(default)]
    pub abbreviation: String,
    pub city: String,
    pub full_name: String,
    #[serde(default)]
    pub name: String,
}

impl ListedTeam {
    fn normalized(self) -> Self {
        ListedTeam {
            id: self.id,
            abbreviation: normalize_name(&self.abbreviation),
            city: normalize_name(&self.city),
            full_name: normalize_name(&self.full_name),
            name: normalize_name(&self.name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TeamListing {
    data: Vec<ListedTeam>,
}

/// Resolves a city name to a coordinate
pub trait LocationResolver {
    fn resolve(&self, city: &str) -> Result<Location>;
}

/// Offline resolver backed by a fixed table of NBA host cities
pub struct CityTable {
    cities: HashMap<String, Location>,
}

impl Default for CityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CityTable {
    pub fn new() -> Self {
        let table: &[(&str, f64, f64)] = &[
            ("Atlanta", 33.749, -84.388),
            ("Boston", 42.3601, -71.0589),
            ("Brooklyn", 40.6782, -73.9442),
            ("Charlotte", 35.2271, -80.8431),
            ("Chicago", 41.8781, -87.6298),
            ("Cleveland", 41.4993, -81.6944),
            ("Dallas", 32.7767, -96.797),
            ("Denver", 39.7392, -104.9903),
            ("Detroit", 42.3314, -83.0458),
            ("San Francisco", 37.7749, -122.4194),
            ("Houston", 29.7604, -95.3698),
            ("Indianapolis", 39.7684, -86.1581),
            ("Los Angeles", 34.0522, -118.2437),
            ("Memphis", 35.1495, -90.049),
            ("Miami", 25.7617, -80.1918),
            ("Milwaukee", 43.0389, -87.9065),
            ("Minneapolis", 44.9778, -93.265),
            ("New Orleans", 29.9511, -90.0715),
            ("New York", 40.7128, -74.006),
            ("Oklahoma City", 35.4676, -97.5164),
            ("Orlando", 28.5383, -81.3792),
            ("Philadelphia", 39.9526, -75.1652),
            ("Phoenix", 33.4484, -112.074),
            ("Portland", 45.5152, -122.6784),
            ("Sacramento", 38.5816, -121.4944),
            ("San Antonio", 29.4241, -98.4936),
            ("Toronto", 43.6532, -79.3832),
            ("Salt Lake City", 40.7608, -111.891),
            ("Washington", 38.9072, -77.0369),
        ];

        CityTable {
            cities: table
                .iter()
                .map(|(city, lat, lon)| (city.to_lowercase(), Location::new(*lat, *lon)))
                .collect(),
        }
    }
}

impl LocationResolver for CityTable {
    fn resolve(&self, city: &str) -> Result<Location> {
        self.cities
            .get(&city.trim().to_lowercase())
            .copied()
            .ok_or_else(|| HoopsError::Geocode(city.to_string()))
    }
}

/// Online resolver using the ArcGIS World geocoding service
pub struct ArcGisResolver {
    client: reqwest::blocking::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    candidates: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    location: GeocodePoint,
}

#[derive(Debug, Deserialize)]
struct GeocodePoint {
    x: f64,
    y: f64,
}

impl ArcGisResolver {
    pub const ENDPOINT: &'static str =
        "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates";

    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("hoops-features/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(ArcGisResolver {
            client,
            endpoint: Self::ENDPOINT.to_string(),
        })
    }
}

impl LocationResolver for ArcGisResolver {
    fn resolve(&self, city: &str) -> Result<Location> {
        log::debug!("Geocoding {}", city);
        let response: GeocodeResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("SingleLine", city), ("f", "json"), ("maxLocations", "1")])
            .send()?
            .error_for_status()?
            .json()?;

        response
            .candidates
            .first()
            .map(|c| Location::new(c.location.y, c.location.x))
            .ok_or_else(|| HoopsError::Geocode(city.to_string()))
    }
}

/// Flat CSV form of a directory entry
#[derive(Debug, Serialize, Deserialize)]
struct TeamRow {
    id: i64,
    full_name: String,
    city: String,
    latitude: f64,
    longitude: f64,
}

impl From<&TeamEntry> for TeamRow {
    fn from(entry: &TeamEntry) -> Self {
        TeamRow {
            id: entry.id,
            full_name: entry.full_name.clone(),
            city: entry.city.clone(),
            latitude: entry.location.latitude,
            longitude: entry.location.longitude,
        }
    }
}

impl From<TeamRow> for TeamEntry {
    fn from(row: TeamRow) -> Self {
        TeamEntry {
            id: row.id,
            full_name: row.full_name,
            city: row.city,
            location: Location::new(row.latitude, row.longitude),
        }
    }
}

/// Lookup of teams by full name (case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: Vec<TeamEntry>,
    by_name: HashMap<String, usize>,
}

impl TeamDirectory {
    pub fn new(teams: Vec<TeamEntry>) -> Self {
        let by_name = teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.full_name.to_lowercase(), i))
            .collect();
        TeamDirectory { teams, by_name }
    }

    /// Normalize a team listing and resolve each team's city
    pub fn from_listing(
        listing: Vec<ListedTeam>,
        resolver: &dyn LocationResolver,
    ) -> Result<Self> {
        let teams = listing
            .into_iter()
            .map(ListedTeam::normalized)
            .map(|team| -> Result<TeamEntry> {
                let location = resolver.resolve(&team.city)?;
                Ok(TeamEntry {
                    id: team.id,
                    full_name: team.full_name,
                    city: team.city,
                    location,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(teams))
    }

    /// Fetch the team listing from the API and resolve it
    pub fn fetch(api_url: &str, resolver: &dyn LocationResolver) -> Result<Self> {
        log::info!("Fetching team listing from {}", api_url);
        let client = reqwest::blocking::Client::builder()
            .user_agent("hoops-features/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        let body = client.get(api_url).send()?.error_for_status()?.text()?;
        let directory = Self::from_listing(parse_listing(&body)?, resolver)?;
        log::info!("Resolved {} teams", directory.len());
        Ok(directory)
    }

    /// Look up a team. A miss means upstream names were not normalized.
    pub fn get(&self, full_name: &str) -> Result<&TeamEntry> {
        self.by_name
            .get(&full_name.trim().to_lowercase())
            .map(|&i| &self.teams[i])
            .ok_or_else(|| HoopsError::UnknownTeam(full_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamEntry> {
        self.teams.iter()
    }

    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let teams = reader
            .deserialize::<TeamRow>()
            .map(|row| -> Result<TeamEntry> { Ok(TeamEntry::from(row?)) })
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "Loaded {} teams from {}",
            teams.len(),
            path.as_ref().display()
        );
        Ok(Self::new(teams))
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for team in &self.teams {
            writer.serialize(TeamRow::from(team))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Parse a balldontlie `/teams` response body
pub fn parse_listing(body: &str) -> Result<Vec<ListedTeam>> {
    let listing: TeamListing = serde_json::from_str(body)?;
    Ok(listing.data)
}
