//! Log view of the table: renders every table event as a log line.

use set_table::table::TableEvent;
use tokio::{sync::mpsc, task::JoinHandle};

/// One line of text for `event`
pub fn describe(event: &TableEvent) -> String {
    match event {
        TableEvent::CardPlaced { card, slot } => format!("card {} placed in slot {}", card, slot),
        TableEvent::CardRemoved { slot } => format!("slot {} cleared", slot),
        TableEvent::TokenPlaced { player, slot } => {
            format!("player {} put a token on slot {}", player, slot)
        }
        TableEvent::TokenRemoved { player, slot } => {
            format!("player {} lost its token on slot {}", player, slot)
        }
        TableEvent::Countdown { remaining, warn } => {
            if *warn {
                format!("{:.1}s left in the round", remaining.as_secs_f64())
            } else {
                format!("{}s left in the round", remaining.as_secs())
            }
        }
        TableEvent::ScoreChanged { player, score } => {
            format!("player {} scored, now at {}", player, score)
        }
        TableEvent::Penalized { player } => format!("player {} claimed a non-set", player),
        TableEvent::Frozen { player, remaining } => {
            format!("player {} frozen for {}ms", player, remaining.as_millis())
        }
        TableEvent::Winners(winners) => match winners.as_slice() {
            [] => "no players, no winner".to_string(),
            [winner] => format!("player {} wins", winner),
            _ => format!("players {:?} tie for the win", winners),
        },
    }
}

/// Drain `events` into the log until every publisher is gone
pub fn spawn(mut events: mpsc::Receiver<TableEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let line = describe(&event);
            match event {
                TableEvent::ScoreChanged { .. }
                | TableEvent::Penalized { .. }
                | TableEvent::Winners(_) => tracing::info!("{}", line),
                TableEvent::Countdown { warn: true, .. } => tracing::warn!("{}", line),
                TableEvent::Frozen { .. } => tracing::trace!("{}", line),
                _ => tracing::debug!("{}", line),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use set_table::game::Card;
    use std::time::Duration;

    #[test]
    fn test_describe_countdown() {
        let calm = TableEvent::Countdown {
            remaining: Duration::from_millis(42_700),
            warn: false,
        };
        let urgent = TableEvent::Countdown {
            remaining: Duration::from_millis(3_400),
            warn: true,
        };

        assert_eq!(describe(&calm), "42s left in the round");
        assert_eq!(describe(&urgent), "3.4s left in the round");
    }

    #[test]
    fn test_describe_winners() {
        assert_eq!(describe(&TableEvent::Winners(vec![2])), "player 2 wins");
        assert_eq!(
            describe(&TableEvent::Winners(vec![0, 3])),
            "players [0, 3] tie for the win"
        );
    }

    #[test]
    fn test_describe_card() {
        let event = TableEvent::CardPlaced {
            card: Card(17),
            slot: 4,
        };
        assert_eq!(describe(&event), "card #17 placed in slot 4");
    }

    #[tokio::test]
    async fn test_view_ends_when_publishers_leave() {
        let (sender, receiver) = mpsc::channel(4);
        let view = spawn(receiver);

        sender
            .send(TableEvent::Penalized { player: 1 })
            .await
            .unwrap();
        drop(sender);

        view.await.unwrap();
    }
}
