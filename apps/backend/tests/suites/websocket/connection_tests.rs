// WebSocket connection, greeting and framing tests

use std::time::Duration;

use tokio_tungstenite::connect_async;

use super::{create_room, wait_for_room};
use crate::support::build_test_state;
use crate::support::websocket::{start_test_server, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;

#[tokio::test]
async fn connected_greeting_carries_user_id() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;

    let mut client = server.connect(11, "kim").await?;
    wait_for_connections(&server.state.hub, 1, Duration::from_secs(2)).await?;

    client.close().await?;
    wait_for_connections(&server.state.hub, 0, Duration::from_secs(2)).await?;
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn upgrade_without_token_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;

    let url = format!("ws://{}/api/ws", server.addr);
    assert!(connect_async(url.as_str()).await.is_err());

    let bad = server.ws_url("not-a-jwt");
    assert!(connect_async(bad.as_str()).await.is_err());

    assert_eq!(server.state.hub.connection_count(), 0);
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn seated_user_receives_room_on_connect() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;
    let key = create_room(&server.state, (1, "alice"), 2);

    let mut alice = server.connect(1, "alice").await?;
    let room = wait_for_room(&mut alice, |_| true).await?;
    assert_eq!(room["key"], key.to_string());
    assert_eq!(room["status"], "LOBBY");

    alice.close().await?;
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn get_room_without_seat_returns_error() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;

    let mut client = server.connect(3, "cy").await?;
    client.send(r#"{"type":"get-room"}"#).await?;
    let err = client.expect_type("error").await?;
    assert_eq!(err["code"], "ROOM_NOT_FOUND");

    client.close().await?;
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn malformed_frame_closes_session() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;

    let mut client = server.connect(4, "dee").await?;
    client.send(r#"{"type":"cheat"}"#).await?;
    let err = client.expect_type("error").await?;
    assert_eq!(err["code"], "BAD_REQUEST");
    let next = client.recv_json_timeout(Duration::from_secs(2)).await;
    assert!(!matches!(next, Ok(Some(_))), "session should be closed: {next:?}");

    wait_for_connections(&server.state.hub, 0, Duration::from_secs(2)).await?;
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn second_connection_for_same_user_is_tracked() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state()).await?;

    let mut first = server.connect(5, "eli").await?;
    let mut second: WebSocketClient = server.connect(5, "eli").await?;
    wait_for_connections(&server.state.hub, 2, Duration::from_secs(2)).await?;
    assert!(server.state.hub.is_connected(5));

    first.close().await?;
    wait_for_connections(&server.state.hub, 1, Duration::from_secs(2)).await?;
    assert!(server.state.hub.is_connected(5));

    second.close().await?;
    wait_for_connections(&server.state.hub, 0, Duration::from_secs(2)).await?;
    server.shutdown().await;
    Ok(())
}
