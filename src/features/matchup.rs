//! Winner/loser (team_i/team_j) view of a game
//!
//! Re-expresses home/visitor fields by outcome. Pure and row-local.

use crate::features::rest::{GameRest, RestedGame};
use crate::{GameRecord, Side};

/// A game oriented by outcome rather than by venue role
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub game: GameRecord,
    pub rest: GameRest,
    /// Venue role the winner occupied
    pub winner_side: Side,
    pub winner: String,
    pub loser: String,
    pub margin: u16,
    pub rest_winner: u8,
    pub rest_loser: u8,
    pub home_flag_winner: bool,
    pub home_flag_loser: bool,
}

impl Matchup {
    pub fn from_rested(rested: RestedGame) -> Self {
        let RestedGame { game, rest } = rested;
        let winner_side = game.winner_side();
        let (rest_winner, rest_loser) = by_outcome(winner_side, rest.home, rest.visitor);
        let (home_flag_winner, home_flag_loser) = by_outcome(
            winner_side,
            game.has_attendance(),
            false,
        );

        Matchup {
            winner: game.winner().to_string(),
            loser: game.loser().to_string(),
            margin: game.margin(),
            winner_side,
            rest_winner,
            rest_loser,
            home_flag_winner,
            home_flag_loser,
            rest,
            game,
        }
    }

    /// Reorder a (home, visitor) pair into (winner, loser)
    pub fn by_outcome<T>(&self, home: T, visitor: T) -> (T, T) {
        by_outcome(self.winner_side, home, visitor)
    }
}

fn by_outcome<T>(winner_side: Side, home: T, visitor: T) -> (T, T) {
    match winner_side {
        Side::Home => (home, visitor),
        Side::Visitor => (visitor, home),
    }
}

pub fn derive_matchups(rested: Vec<RestedGame>) -> Vec<Matchup> {
    rested.into_iter().map(Matchup::from_rested).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameType;
    use chrono::NaiveDate;

    fn rested(visitor_score: u16, home_score: u16, attendance: Option<u32>) -> RestedGame {
        RestedGame {
            game: GameRecord {
                date: NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
                visitor: "Boston Celtics".to_string(),
                home: "Miami Heat".to_string(),
                visitor_score,
                home_score,
                attendance,
                game_type: GameType::RegularSeason,
            },
            rest: GameRest {
                home: 2,
                visitor: 7,
            },
        }
    }

    #[test]
    fn test_home_win() {
        let m = Matchup::from_rested(rested(101, 112, Some(19_600)));

        assert_eq!(m.winner, "Miami Heat");
        assert_eq!(m.loser, "Boston Celtics");
        assert_eq!(m.margin, 11);
        assert_eq!((m.rest_winner, m.rest_loser), (2, 7));
        assert!(m.home_flag_winner);
        assert!(!m.home_flag_loser);
    }

    #[test]
    fn test_visitor_win() {
        let m = Matchup::from_rested(rested(120, 98, Some(19_600)));

        assert_eq!(m.winner, "Boston Celtics");
        assert_eq!(m.loser, "Miami Heat");
        assert_eq!(m.margin, 22);
        assert_eq!((m.rest_winner, m.rest_loser), (7, 2));
        assert!(!m.home_flag_winner);
        assert!(m.home_flag_loser);
    }

    #[test]
    fn test_no_attendance_clears_home_flags() {
        let home_win = Matchup::from_rested(rested(90, 95, None));
        assert!(!home_win.home_flag_winner);
        assert!(!home_win.home_flag_loser);

        let away_win = Matchup::from_rested(rested(95, 90, None));
        assert!(!away_win.home_flag_winner);
        assert!(!away_win.home_flag_loser);
    }

    #[test]
    fn test_by_outcome_reorders_pairs() {
        let m = Matchup::from_rested(rested(120, 98, None));
        assert_eq!(m.by_outcome("home", "visitor"), ("visitor", "home"));
    }
}
