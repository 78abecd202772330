//! Travel distance since each team's previous game
//!
//! Runs only over games that survive the bubble filter, so a team's
//! location state is seeded solely from retained games.

use std::collections::HashMap;

use crate::features::distance::haversine_km;
use crate::features::matchup::Matchup;
use crate::{Location, Side};

/// A retained game merged with the team directory
#[derive(Debug, Clone, PartialEq)]
pub struct VenueGame {
    pub matchup: Matchup,
    pub winner_id: i64,
    pub loser_id: i64,
    /// Static home coordinate of the winner
    pub winner_home: Location,
    /// Static home coordinate of the loser
    pub loser_home: Location,
    /// Where the game was played: the home team's home coordinate
    pub game_location: Location,
}

impl VenueGame {
    /// Static home coordinate of the team that played in `side`
    pub fn home_location_of(&self, side: Side) -> Location {
        if side == self.matchup.winner_side {
            self.winner_home
        } else {
            self.loser_home
        }
    }
}

/// Kilometers travelled into one game by each side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameTravel {
    pub home: f64,
    pub visitor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TravelledGame {
    pub venue: VenueGame,
    pub travel: GameTravel,
    pub travel_winner: f64,
    pub travel_loser: f64,
}

/// Last known location per team, owned by a single scan
#[derive(Debug, Clone, Default)]
pub struct TravelState {
    last_location: HashMap<String, Location>,
}

impl TravelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_location(&self, team: &str) -> Option<Location> {
        self.last_location.get(team).copied()
    }

    /// Compute travel for both teams from the prior state, then move both
    /// teams to the game location.
    ///
    /// With no prior location a visitor is assumed to come from its own
    /// home and a home team is assumed to already be there.
    pub fn step(mut self, game: &VenueGame) -> (Self, GameTravel) {
        let record = &game.matchup.game;
        let here = game.game_location;

        let visitor = match self.last_location(&record.visitor) {
            Some(previous) => haversine_km(here, previous),
            None => haversine_km(here, game.home_location_of(Side::Visitor)),
        };
        let home = match self.last_location(&record.home) {
            Some(previous) => haversine_km(here, previous),
            None => 0.0,
        };

        self.last_location.insert(record.visitor.clone(), here);
        self.last_location.insert(record.home.clone(), here);
        (self, GameTravel { home, visitor })
    }
}

/// Attach travel to every game, returned in chronological order
pub fn calculate_travel(mut games: Vec<VenueGame>) -> Vec<TravelledGame> {
    games.sort_by_key(|g| g.matchup.game.date);

    let capacity = games.len();
    let (state, travelled) = games.into_iter().fold(
        (TravelState::new(), Vec::with_capacity(capacity)),
        |(state, mut travelled), venue| {
            let (state, travel) = state.step(&venue);
            let (travel_winner, travel_loser) =
                venue.matchup.by_outcome(travel.home, travel.visitor);
            travelled.push(TravelledGame {
                venue,
                travel,
                travel_winner,
                travel_loser,
            });
            (state, travelled)
        },
    );

    log::debug!(
        "Computed travel for {} games across {} teams",
        travelled.len(),
        state.last_location.len()
    );
    travelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rest::{GameRest, RestedGame};
    use crate::{GameRecord, GameType};
    use chrono::NaiveDate;

    const PHI: Location = Location {
        latitude: 40.0,
        longitude: -75.0,
    };
    const LAL: Location = Location {
        latitude: 34.0,
        longitude: -118.0,
    };
    const CHI: Location = Location {
        latitude: 41.9,
        longitude: -87.6,
    };

    fn home_of(team: &str) -> Location {
        match team {
            "PHI" => PHI,
            "LAL" => LAL,
            "CHI" => CHI,
            other => panic!("no home for {}", other),
        }
    }

    fn venue_game(visitor: &str, home: &str, day: u32, home_won: bool) -> VenueGame {
        let (visitor_score, home_score) = if home_won { (90, 100) } else { (100, 90) };
        let matchup = Matchup::from_rested(RestedGame {
            game: GameRecord {
                date: NaiveDate::from_ymd_opt(2019, 12, day).unwrap(),
                visitor: visitor.to_string(),
                home: home.to_string(),
                visitor_score,
                home_score,
                attendance: Some(18_000),
                game_type: GameType::RegularSeason,
            },
            rest: GameRest {
                home: 10,
                visitor: 10,
            },
        });
        VenueGame {
            winner_id: 1,
            loser_id: 2,
            winner_home: home_of(&matchup.winner),
            loser_home: home_of(&matchup.loser),
            game_location: home_of(home),
            matchup,
        }
    }

    #[test]
    fn test_first_away_game_travels_from_home() {
        // PHI's first game is at LAL and PHI wins
        let travelled = calculate_travel(vec![venue_game("PHI", "LAL", 1, false)]);
        let t = &travelled[0];

        let expected = haversine_km(LAL, PHI);
        assert!((t.travel.visitor - expected).abs() < 1e-9);
        assert!((t.travel_winner - expected).abs() < 1e-9);
        assert!((expected - 3_838.65).abs() < 0.01);
    }

    #[test]
    fn test_first_home_game_is_zero() {
        let travelled = calculate_travel(vec![venue_game("PHI", "LAL", 1, true)]);
        let t = &travelled[0];

        assert_eq!(t.travel.home, 0.0);
        assert_eq!(t.travel_winner, 0.0);
        assert!((t.travel_loser - haversine_km(LAL, PHI)).abs() < 1e-9);
    }

    #[test]
    fn test_travel_follows_previous_venue() {
        let travelled = calculate_travel(vec![
            venue_game("PHI", "LAL", 1, true),
            venue_game("PHI", "CHI", 3, true),
            venue_game("CHI", "PHI", 5, true),
        ]);

        // PHI: LAL -> CHI -> PHI
        assert!((travelled[1].travel.visitor - haversine_km(CHI, LAL)).abs() < 1e-9);
        assert!((travelled[2].travel.home - haversine_km(PHI, CHI)).abs() < 1e-9);
        // CHI hosted on day 3 then visits PHI: travels from CHI
        assert_eq!(travelled[1].travel.home, 0.0);
        assert!((travelled[2].travel.visitor - haversine_km(PHI, CHI)).abs() < 1e-9);
    }

    #[test]
    fn test_consecutive_home_games_do_not_travel() {
        let travelled = calculate_travel(vec![
            venue_game("PHI", "LAL", 1, true),
            venue_game("CHI", "LAL", 2, true),
        ]);
        assert_eq!(travelled[1].travel.home, 0.0);
    }

    #[test]
    fn test_sorts_by_date() {
        let travelled = calculate_travel(vec![
            venue_game("PHI", "CHI", 3, true),
            venue_game("PHI", "LAL", 1, true),
        ]);

        assert_eq!(travelled[0].venue.matchup.game.home, "LAL");
        assert!((travelled[1].travel.visitor - haversine_km(CHI, LAL)).abs() < 1e-9);
    }

    #[test]
    fn test_step_records_game_location() {
        let game = venue_game("PHI", "LAL", 1, true);
        let (state, _) = TravelState::new().step(&game);

        assert_eq!(state.last_location("PHI"), Some(LAL));
        assert_eq!(state.last_location("LAL"), Some(LAL));
        assert_eq!(state.last_location("CHI"), None);
    }
}
