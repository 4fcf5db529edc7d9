//! Dealer outcome types.

use crate::game::{Card, PlayerId, Slot};
use serde::Serialize;

/// Outcome of adjudicating one claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Legal set: the slots were vacated and the player scored
    Scored { slots: Vec<Slot>, cards: Vec<Card> },

    /// Not a set: the player was penalized, the table is untouched
    Penalized { slots: Vec<Slot> },

    /// The claim no longer has the right size when served (a token was
    /// taken back or cleared); nothing happens
    Discarded { held: usize, required: usize },

    /// No seated player has this id
    UnknownPlayer(PlayerId),
}

impl Verdict {
    pub fn is_scored(&self) -> bool {
        matches!(self, Verdict::Scored { .. })
    }
}

/// Why the dealer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Termination was requested from outside
    Terminated,
    /// No legal set is left among the cards still in play
    Exhausted,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::Terminated => write!(f, "terminated"),
            EndReason::Exhausted => write!(f, "no sets left"),
        }
    }
}

/// Final result of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub reason: EndReason,

    /// Rounds dealt, including the one that was running when the game ended
    pub rounds: u32,

    /// Every player tied at the top score, ascending
    pub winners: Vec<PlayerId>,

    /// `(player, score)` in seat order
    pub scores: Vec<(PlayerId, u32)>,

    /// Cards still in play (deck plus table) at the end
    pub cards_left: usize,
}

/// Every player tied at the highest score, ascending by id
pub fn winners(scores: &[(PlayerId, u32)]) -> Vec<PlayerId> {
    let Some(top) = scores.iter().map(|&(_, score)| score).max() else {
        return Vec::new();
    };

    let mut winners: Vec<PlayerId> = scores
        .iter()
        .filter(|&&(_, score)| score == top)
        .map(|&(player, _)| player)
        .collect();
    winners.sort_unstable();
    winners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_winner() {
        assert_eq!(winners(&[(0, 2), (1, 5), (2, 3)]), vec![1]);
    }

    #[test]
    fn test_ties_are_co_winners() {
        assert_eq!(winners(&[(2, 4), (0, 4), (1, 1)]), vec![0, 2]);
        assert_eq!(winners(&[(0, 0), (1, 0)]), vec![0, 1]);
    }

    #[test]
    fn test_no_players_no_winners() {
        assert!(winners(&[]).is_empty());
    }

    #[test]
    fn test_summary_serializes_reason_in_snake_case() {
        let summary = GameSummary {
            reason: EndReason::Exhausted,
            rounds: 3,
            winners: vec![1],
            scores: vec![(0, 1), (1, 2)],
            cards_left: 5,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""reason":"exhausted""#));
        assert!(json.contains(r#""winners":[1]"#));
    }
}
