//! Room builders shared by the domain test modules.

use std::sync::Arc;

use crate::domain::card_pool::CardPool;
use crate::domain::deck::Deck;
use crate::domain::ids::{CardId, RoomKey, UserId};
use crate::domain::room::{Room, RoomOptions};

pub fn numbered_deck(prompts: usize, responses: usize) -> Arc<Deck> {
    Arc::new(
        Deck::new(
            "numbered",
            "Numbered",
            (0..prompts).map(|i| format!("prompt #{i}")).collect(),
            (0..responses).map(|i| format!("response #{i}")).collect(),
        )
        .expect("numbered deck is valid"),
    )
}

/// A lobby seating `players` in order; the first is host.
pub fn make_room(players: &[UserId], card_limit: u32, rounds: u32) -> Room {
    make_room_with_deck(players, card_limit, rounds, numbered_deck(60, 400))
}

pub fn make_room_with_deck(
    players: &[UserId],
    card_limit: u32,
    rounds: u32,
    deck: Arc<Deck>,
) -> Room {
    let options = RoomOptions {
        card_limit,
        rounds,
        deck: deck.id().to_string(),
        private_lobby: false,
        player_limit: 16,
    };
    let pool = CardPool::new(deck, 42);
    let mut room = Room::new(RoomKey::generate(), options, pool, players[0], name(players[0]));
    for &id in &players[1..] {
        room.join(id, name(id)).expect("join lobby");
    }
    room
}

pub fn name(id: UserId) -> String {
    format!("player-{id}")
}

/// First card in the participant's hand.
pub fn first_in_hand(room: &Room, user_id: UserId) -> CardId {
    room.roster
        .get(user_id)
        .and_then(|p| p.hand().next())
        .map(|c| c.id())
        .expect("participant holds a card")
}

/// Every non-judge plays, everything is flipped, and the judge picks the
/// first submission.
pub fn play_out_round(room: &mut Room) -> UserId {
    let judge = room.judge().expect("round in progress");
    let players: Vec<UserId> = room.roster.eligible(judge).map(|p| p.user_id).collect();
    let mut played = Vec::new();
    for &p in &players {
        let card = first_in_hand(room, p);
        room.play_card(p, card).expect("play");
        played.push(card);
    }
    for &card in &played {
        room.flip_card(judge, card).expect("flip");
    }
    room.vote_card(judge, played[0]).expect("vote");
    judge
}
