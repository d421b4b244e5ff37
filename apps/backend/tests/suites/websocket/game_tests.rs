// End-to-end rounds played over websockets

use serde_json::{json, Value};

use super::{create_room, join_frame, participant, phase, wait_for_room};
use crate::support::build_test_state;
use crate::support::websocket::start_test_server;

fn own_card_ids(room: &Value, user_id: i64) -> Vec<u64> {
    participant(room, user_id)["cards"]
        .as_array()
        .map(|cards| {
            cards
                .iter()
                .filter(|c| c["state"] == "IN_HAND")
                .filter_map(|c| c["id"].as_u64())
                .collect()
        })
        .unwrap_or_default()
}

fn submitted_card(room: &Value, user_id: i64) -> Option<&Value> {
    participant(room, user_id)["cards"]
        .as_array()?
        .iter()
        .find(|c| c["state"] != "IN_HAND")
}

#[tokio::test]
async fn single_round_game_is_played_to_the_end() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;
    let key = create_room(&server.state, (1, "alice"), 1);

    let mut alice = server.connect(1, "alice").await?;
    wait_for_room(&mut alice, |_| true).await?;

    let mut bob = server.connect(2, "bob").await?;
    bob.send_json(&join_frame(key)).await?;
    let room = wait_for_room(&mut bob, |_| true).await?;
    assert_eq!(room["participants"].as_array().map(Vec::len), Some(2));

    let mut carol = server.connect(3, "carol").await?;
    carol.send_json(&join_frame(key)).await?;
    wait_for_room(&mut carol, |_| true).await?;
    wait_for_room(&mut alice, |r| r["participants"].as_array().map(Vec::len) == Some(3)).await?;

    alice.send(r#"{"type":"start"}"#).await?;
    let room = wait_for_room(&mut alice, |r| phase(r) == "SUBMITTING").await?;
    assert_eq!(room["status"], "PLAYING");
    assert_eq!(room["round"]["judgeId"], 1);
    assert_eq!(participant(&room, 1)["isJudge"], true);
    assert_eq!(participant(&room, 1)["handSize"], 0);
    // Other hands are hidden from the judge.
    assert_eq!(participant(&room, 2)["handSize"], 3);
    assert!(participant(&room, 2)["cards"].as_array().unwrap().is_empty());

    let bob_room = wait_for_room(&mut bob, |r| phase(r) == "SUBMITTING").await?;
    let bob_cards = own_card_ids(&bob_room, 2);
    assert_eq!(bob_cards.len(), 3);
    assert!(participant(&bob_room, 2)["cards"][0]["text"].is_string());

    let carol_room = wait_for_room(&mut carol, |r| phase(r) == "SUBMITTING").await?;
    let carol_cards = own_card_ids(&carol_room, 3);

    bob.send_json(&json!({"type": "play-card", "card_id": bob_cards[0]}))
        .await?;
    carol
        .send_json(&json!({"type": "play-card", "card_id": carol_cards[0]}))
        .await?;

    let room = wait_for_room(&mut alice, |r| phase(r) == "REVEALING").await?;
    let hidden = submitted_card(&room, 2).expect("bob's card is on the table");
    assert_eq!(hidden["state"], "SUBMITTED_HIDDEN");
    assert!(hidden.get("text").is_none());

    for card_id in [bob_cards[0], carol_cards[0]] {
        alice
            .send_json(&json!({"type": "flip-card", "card_id": card_id}))
            .await?;
    }
    let room = wait_for_room(&mut alice, |r| phase(r) == "VOTING").await?;
    let revealed = submitted_card(&room, 3).expect("carol's card is on the table");
    assert_eq!(revealed["state"], "SUBMITTED_REVEALED");
    assert!(revealed["text"].is_string());

    alice
        .send_json(&json!({"type": "vote-card", "card_id": bob_cards[0]}))
        .await?;
    let room = wait_for_room(&mut carol, |r| r["status"] == "GAME_OVER").await?;
    assert!(room["round"].is_null());
    assert_eq!(participant(&room, 2)["score"], 1);
    assert_eq!(participant(&room, 3)["score"], 0);

    let history = room["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["roundNo"], 1);
    assert_eq!(history[0]["judge"], 1);
    assert_eq!(history[0]["outcome"]["kind"], "won");
    assert_eq!(history[0]["outcome"]["winner"], 2);

    for mut client in [alice, bob, carol] {
        client.close().await?;
    }
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn rejected_actions_reply_with_error_frames() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;
    let key = create_room(&server.state, (1, "alice"), 2);

    let mut alice = server.connect(1, "alice").await?;
    wait_for_room(&mut alice, |_| true).await?;

    alice.send(r#"{"type":"start"}"#).await?;
    let err = alice.expect_type("error").await?;
    assert_eq!(err["code"], "NOT_ENOUGH_PLAYERS");

    let mut bob = server.connect(2, "bob").await?;
    bob.send_json(&join_frame(key)).await?;
    wait_for_room(&mut bob, |_| true).await?;

    bob.send(r#"{"type":"start"}"#).await?;
    let err = bob.expect_type("error").await?;
    assert_eq!(err["code"], "NOT_HOST");

    bob.send(r#"{"type":"play-card","card_id":1}"#).await?;
    let err = bob.expect_type("error").await?;
    assert_eq!(err["code"], "PHASE_MISMATCH");

    alice.send(r#"{"type":"start"}"#).await?;
    let room = wait_for_room(&mut bob, |r| phase(r) == "SUBMITTING").await?;
    let card = own_card_ids(&room, 2)[0];

    // The judge may not submit.
    alice
        .send_json(&json!({"type": "play-card", "card_id": card}))
        .await?;
    let err = alice.expect_type("error").await?;
    assert_eq!(err["code"], "NOT_ELIGIBLE");

    bob.send_json(&json!({"type": "play-card", "card_id": card}))
        .await?;
    bob.send_json(&json!({"type": "play-card", "card_id": card}))
        .await?;
    let err = bob.expect_type("error").await?;
    assert_eq!(err["code"], "ALREADY_PLAYED");

    bob.send_json(&json!({"type": "vote-card", "card_id": card}))
        .await?;
    let err = bob.expect_type("error").await?;
    assert_eq!(err["code"], "NOT_JUDGE");

    for mut client in [alice, bob] {
        client.close().await?;
    }
    server.shutdown().await;
    Ok(())
}
