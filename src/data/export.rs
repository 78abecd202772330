//! CSV output of the feature table

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::features::travel::TravelledGame;
use crate::{GameType, Result};

/// One output row, oriented winner (i) / loser (j)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub team_i: String,
    pub team_j: String,
    pub margin_ij: u16,
    pub rest_i: u8,
    pub rest_j: u8,
    pub home_i: u8,
    pub home_j: u8,
    pub travel_i: f64,
    pub travel_j: f64,
    pub id_i: i64,
    pub id_j: i64,
    pub game_type: GameType,
}

impl From<&TravelledGame> for FeatureRow {
    fn from(t: &TravelledGame) -> Self {
        let m = &t.venue.matchup;
        FeatureRow {
            date: m.game.date,
            team_i: m.winner.clone(),
            team_j: m.loser.clone(),
            margin_ij: m.margin,
            rest_i: m.rest_winner,
            rest_j: m.rest_loser,
            home_i: m.home_flag_winner as u8,
            home_j: m.home_flag_loser as u8,
            travel_i: t.travel_winner,
            travel_j: t.travel_loser,
            id_i: t.venue.winner_id,
            id_j: t.venue.loser_id,
            game_type: m.game.game_type,
        }
    }
}

pub fn write_features<P: AsRef<Path>>(path: P, rows: &[FeatureRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn read_features<P: AsRef<Path>>(path: P) -> Result<Vec<FeatureRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Summary of a written feature table
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSummary {
    pub rows: usize,
    pub teams: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub mean_travel_km: f64,
}

pub fn summarize(rows: &[FeatureRow]) -> FeatureSummary {
    let teams: BTreeSet<_> = rows
        .iter()
        .flat_map(|r| [r.team_i.as_str(), r.team_j.as_str()])
        .collect();
    let total_travel: f64 = rows.iter().map(|r| r.travel_i + r.travel_j).sum();

    FeatureSummary {
        rows: rows.len(),
        teams: teams.len(),
        first_date: rows.iter().map(|r| r.date).min(),
        last_date: rows.iter().map(|r| r.date).max(),
        mean_travel_km: if rows.is_empty() {
            0.0
        } else {
            total_travel / (2 * rows.len()) as f64
        },
    }
}
