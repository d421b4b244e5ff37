//! Whole-round scenarios driven through the orchestrator.

use crate::domain::cards::CardState;
use crate::domain::room::{RoomStatus, RoundOutcome};
use crate::domain::round::RoundPhase;
use crate::domain::test_state_helpers::{first_in_hand, make_room, play_out_round};
use crate::errors::domain::{DomainError, ValidationKind};

const J: i64 = 1;
const P1: i64 = 2;
const P2: i64 = 3;

fn phase(room: &crate::domain::room::Room) -> RoundPhase {
    room.round.as_ref().expect("round in progress").phase()
}

#[test]
fn three_player_round_scores_and_rotates_judge() {
    let mut room = make_room(&[J, P1, P2], 5, 5);
    room.start_game(J).unwrap();

    assert_eq!(phase(&room), RoundPhase::Submitting);
    assert_eq!(room.judge(), Some(J));
    assert_eq!(room.roster.get(J).unwrap().hand_len(), 0);
    assert_eq!(room.roster.get(P1).unwrap().hand_len(), 5);
    assert_eq!(room.roster.get(P2).unwrap().hand_len(), 5);

    let c1 = first_in_hand(&room, P1);
    let c2 = first_in_hand(&room, P2);

    room.play_card(P1, c1).unwrap();
    assert!(room.roster.get(P1).unwrap().has_submitted);
    assert_eq!(phase(&room), RoundPhase::Submitting);

    room.play_card(P2, c2).unwrap();
    assert_eq!(phase(&room), RoundPhase::Revealing);

    room.flip_card(P1, c1).unwrap();
    assert_eq!(phase(&room), RoundPhase::Revealing);
    room.flip_card(P2, c2).unwrap();
    assert_eq!(phase(&room), RoundPhase::Voting);

    let winning_text = room.roster.find_card(c2).unwrap().text().to_string();
    room.vote_card(J, c2).unwrap();

    assert_eq!(room.score_of(P2), Some(1));
    assert_eq!(room.score_of(P1), Some(0));
    assert_eq!(
        room.history[0].outcome,
        RoundOutcome::Won {
            winner: P2,
            card: winning_text
        }
    );

    let round = room.round.as_ref().unwrap();
    assert_eq!(round.round_no(), 2);
    assert_eq!(round.judge(), P1);
    assert_eq!(round.phase(), RoundPhase::Submitting);

    // Played cards are gone, the new judge keeps the rest, J is dealt in.
    assert!(room.roster.find_card(c1).is_none());
    assert_eq!(room.roster.get(P1).unwrap().hand_len(), 4);
    assert_eq!(room.roster.get(P2).unwrap().hand_len(), 5);
    assert_eq!(room.roster.get(J).unwrap().hand_len(), 5);
    assert!(room.roster.iter().all(|p| !p.has_submitted));
}

#[test]
fn double_submission_leaves_first_effect_unchanged() {
    let mut room = make_room(&[J, P1, P2], 3, 3);
    room.start_game(J).unwrap();
    let hand: Vec<_> = room.roster.get(P1).unwrap().hand().map(|c| c.id()).collect();

    room.play_card(P1, hand[0]).unwrap();
    let err = room.play_card(P1, hand[1]).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::AlreadyPlayed, _)
    ));

    let round = room.round.as_ref().unwrap();
    assert_eq!(round.submissions().len(), 1);
    assert_eq!(round.submissions()[0].card_id, hand[0]);
    assert_eq!(
        room.roster.find_card(hand[1]).unwrap().state(),
        CardState::InHand
    );
}

#[test]
fn judge_leaving_during_voting_abandons_round() {
    let mut room = make_room(&[1, 2, 3, 4], 3, 10);
    room.start_game(1).unwrap();
    play_out_round(&mut room);
    assert_eq!(room.judge(), Some(2));
    let scores_before: Vec<u32> = room.roster.iter().map(|p| p.score).collect();

    let judge = 2;
    let players: Vec<i64> = room.roster.eligible(judge).map(|p| p.user_id).collect();
    let mut played = Vec::new();
    for &p in &players {
        let card = first_in_hand(&room, p);
        room.play_card(p, card).unwrap();
        played.push(card);
    }
    for &card in &played {
        room.flip_card(3, card).unwrap();
    }
    assert_eq!(phase(&room), RoundPhase::Voting);

    let departure = room.remove_participant(judge).unwrap();
    assert!(departure.round_abandoned);
    assert_eq!(room.history[1].outcome, RoundOutcome::Abandoned);
    assert_eq!(room.history[1].judge, judge);

    let scores_after: Vec<u32> = room.roster.iter().map(|p| p.score).collect();
    let expected: Vec<u32> = scores_before
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .map(|(_, s)| *s)
        .collect();
    assert_eq!(scores_after, expected);

    // Rotation continues from the departed judge's seat.
    let round = room.round.as_ref().unwrap();
    assert_eq!(round.round_no(), 3);
    assert_eq!(round.judge(), 3);
    assert_eq!(round.phase(), RoundPhase::Submitting);
    assert!(room.roster.iter().all(|p| !p.has_submitted));
    assert!(room
        .roster
        .iter()
        .flat_map(|p| p.cards.iter())
        .all(|c| c.state() == CardState::InHand));
}

#[test]
fn last_seat_judge_leaving_wraps_to_first_seat() {
    let mut room = make_room(&[1, 2, 3], 2, 10);
    room.start_game(1).unwrap();
    play_out_round(&mut room);
    play_out_round(&mut room);
    assert_eq!(room.judge(), Some(3));

    room.remove_participant(3).unwrap();
    assert_eq!(room.judge(), Some(1));
    assert_eq!(room.status, RoomStatus::Playing);
}

#[test]
fn non_judge_leaving_mid_submission_lets_round_progress() {
    let mut room = make_room(&[J, P1, P2], 3, 3);
    room.start_game(J).unwrap();
    let c1 = first_in_hand(&room, P1);
    room.play_card(P1, c1).unwrap();

    let departure = room.remove_participant(P2).unwrap();
    assert!(!departure.round_abandoned);
    assert_eq!(phase(&room), RoundPhase::Revealing);

    room.flip_card(J, c1).unwrap();
    room.vote_card(J, c1).unwrap();
    assert_eq!(room.score_of(P1), Some(1));
}

#[test]
fn non_judge_cannot_vote() {
    let mut room = make_room(&[J, P1, P2], 2, 3);
    room.start_game(J).unwrap();
    let c1 = first_in_hand(&room, P1);
    let c2 = first_in_hand(&room, P2);
    room.play_card(P1, c1).unwrap();
    room.play_card(P2, c2).unwrap();
    room.flip_card(P1, c1).unwrap();
    room.flip_card(P1, c2).unwrap();

    let err = room.vote_card(P1, c2).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::NotJudge, _)));
    assert_eq!(phase(&room), RoundPhase::Voting);
}

#[test]
fn game_ends_after_configured_rounds() {
    let mut room = make_room(&[1, 2, 3], 2, 4);
    room.start_game(1).unwrap();
    for _ in 0..4 {
        assert_eq!(room.status, RoomStatus::Playing);
        play_out_round(&mut room);
    }
    assert_eq!(room.status, RoomStatus::GameOver);
    assert_eq!(room.history.len(), 4);
    assert_eq!(room.roster.iter().map(|p| p.score).sum::<u32>(), 4);
    assert_eq!(room.current_round_no(), Some(4));
}
