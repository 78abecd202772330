//! Rest days since each team's previous game
//!
//! Runs over the whole season, playoffs included, so a team's first
//! playoff game still sees its last regular season game.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::GameRecord;

/// Rest is capped here, and a team's first game of the season gets it too
pub const MAX_REST_DAYS: u8 = 10;

/// Rest days for both participants of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRest {
    pub home: u8,
    pub visitor: u8,
}

/// A game together with the rest each side had going into it
#[derive(Debug, Clone, PartialEq)]
pub struct RestedGame {
    pub game: GameRecord,
    pub rest: GameRest,
}

/// Last played date per team, owned by a single scan
#[derive(Debug, Clone, Default)]
pub struct RestState {
    last_played: HashMap<String, NaiveDate>,
}

impl RestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_played(&self, team: &str) -> Option<NaiveDate> {
        self.last_played.get(team).copied()
    }

    /// Rest for `team` on `date` given the state so far (call BEFORE step)
    pub fn rest_days(&self, team: &str, date: NaiveDate) -> u8 {
        match self.last_played(team) {
            Some(previous) => {
                let days = (date - previous).num_days();
                days.clamp(0, MAX_REST_DAYS as i64) as u8
            }
            None => MAX_REST_DAYS,
        }
    }

    /// Compute rest for both teams from the prior state, then record the game
    pub fn step(mut self, game: &GameRecord) -> (Self, GameRest) {
        let rest = GameRest {
            home: self.rest_days(&game.home, game.date),
            visitor: self.rest_days(&game.visitor, game.date),
        };
        self.last_played.insert(game.visitor.clone(), game.date);
        self.last_played.insert(game.home.clone(), game.date);
        (self, rest)
    }
}

/// Attach rest days to every game, returned in chronological order.
///
/// The sort is stable, so games on the same date keep their input order.
pub fn calculate_rest(mut games: Vec<GameRecord>) -> Vec<RestedGame> {
    games.sort_by_key(|g| g.date);

    let capacity = games.len();
    let (state, rested) = games.into_iter().fold(
        (RestState::new(), Vec::with_capacity(capacity)),
        |(state, mut rested), game| {
            let (state, rest) = state.step(&game);
            rested.push(RestedGame { game, rest });
            (state, rested)
        },
    );

    log::debug!(
        "Computed rest for {} games across {} teams",
        rested.len(),
        state.last_played.len()
    );
    rested
}
