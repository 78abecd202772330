//! Bubble game filter
//!
//! Drops playoff games and regular season games played without a crowd.

use crate::features::matchup::Matchup;
use crate::{GameRecord, GameType};

/// Keep regular season games with attendance above zero
pub fn is_retained(game: &GameRecord) -> bool {
    game.game_type == GameType::RegularSeason && game.attendance.unwrap_or(0) > 0
}

pub fn filter_bubble_games(matchups: Vec<Matchup>) -> Vec<Matchup> {
    let before = matchups.len();
    let kept: Vec<_> = matchups
        .into_iter()
        .filter(|m| is_retained(&m.game))
        .collect();
    log::info!(
        "Kept {} of {} games ({} playoff or no-crowd games dropped)",
        kept.len(),
        before,
        before - kept.len()
    );
    kept
}
