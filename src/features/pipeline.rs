//! End-to-end feature derivation for one season
//!
//! segmented rows -> parse -> rest -> matchup -> bubble filter
//! -> team directory merge -> travel -> feature rows

use crate::data::export::FeatureRow;
use crate::data::teams::TeamDirectory;
use crate::features::filter::filter_bubble_games;
use crate::features::matchup::{derive_matchups, Matchup};
use crate::features::rest::calculate_rest;
use crate::features::travel::{calculate_travel, VenueGame};
use crate::{GameRecord, Result, TaggedRow};

/// Parse every tagged row, failing on the first malformed one
pub fn parse_games(season: &[TaggedRow]) -> Result<Vec<GameRecord>> {
    season
        .iter()
        .enumerate()
        .map(|(i, row)| GameRecord::from_row(i, row))
        .collect()
}

/// Attach directory ids and coordinates. The game is played at the home
/// team's home coordinate.
pub fn resolve_venue(matchup: Matchup, directory: &TeamDirectory) -> Result<VenueGame> {
    let winner = directory.get(&matchup.winner)?;
    let loser = directory.get(&matchup.loser)?;
    let game_location = directory.get(&matchup.game.home)?.location;

    Ok(VenueGame {
        winner_id: winner.id,
        loser_id: loser.id,
        winner_home: winner.location,
        loser_home: loser.location,
        game_location,
        matchup,
    })
}

pub fn resolve_venues(matchups: Vec<Matchup>, directory: &TeamDirectory) -> Result<Vec<VenueGame>> {
    matchups
        .into_iter()
        .map(|m| resolve_venue(m, directory))
        .collect()
}

/// Derive the feature table for a segmented season
pub fn build_features(season: &[TaggedRow], directory: &TeamDirectory) -> Result<Vec<FeatureRow>> {
    let games = parse_games(season)?;
    log::info!("Parsed {} games", games.len());

    let matchups = derive_matchups(calculate_rest(games));
    let retained = filter_bubble_games(matchups);
    let venues = resolve_venues(retained, directory)?;
    let travelled = calculate_travel(venues);

    Ok(travelled.iter().map(FeatureRow::from).collect())
}
