//! Hand scoring and winner selection. Low scores are good: points are
//! penalties for cards left in hand when someone goes out.

use std::collections::HashMap;

use crowns_cards::{Card, Rank};
use crowns_protocol::PlayerId;

use crate::state::Player;

/// Points a single hand is carrying under the given wild rank.
///
/// Jokers cost 50, wild-rank cards 20, everything else its face value
/// (J = 11, Q = 12, K = 13). Every player pays for their hand at round
/// end, whether or not they were the one who went out.
pub fn hand_score(hand: &[Card], wild: Rank) -> u32 {
    hand.iter()
        .map(|card| match card {
            Card::Joker => 50,
            Card::Suited(rank, _) if *rank == wild => 20,
            Card::Suited(rank, _) => rank.value(),
        })
        .sum()
}

/// Picks the winner once all rounds are done: the strictly lowest
/// cumulative score. On an exact tie the earlier joiner keeps the win —
/// that is the rule, not an accident of map ordering, which is why the
/// scan runs over the join order.
pub fn winner<'a>(
    join_order: &'a [PlayerId],
    players: &'a HashMap<PlayerId, Player>,
) -> Option<(&'a PlayerId, &'a Player)> {
    let mut best: Option<(&PlayerId, &Player)> = None;
    for id in join_order {
        let Some(player) = players.get(id) else {
            continue;
        };
        match best {
            Some((_, leader)) if player.score >= leader.score => {}
            _ => best = Some((id, player)),
        }
    }
    best
}
