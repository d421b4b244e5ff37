// WebSocket test utilities

use std::net::TcpListener;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use wizz_backend::middleware::request_trace::RequestTrace;
use wizz_backend::middleware::structured_logger::StructuredLogger;
use wizz_backend::routes;
use wizz_backend::state::app_state::AppState;
use wizz_backend::ws::hub::SessionHub;

use crate::support::auth::mint_test_token;
use crate::support::websocket_client::WebSocketClient;

pub struct TestServer {
    pub handle: actix_web::dev::ServerHandle,
    pub addr: std::net::SocketAddr,
    pub join: tokio::task::JoinHandle<Result<(), std::io::Error>>,
    pub state: AppState,
}

impl TestServer {
    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/api/ws?token={}", self.addr, token)
    }

    /// Connect as `user_id` and consume the `connected` greeting.
    pub async fn connect(
        &self,
        user_id: i64,
        username: &str,
    ) -> Result<WebSocketClient, Box<dyn std::error::Error>> {
        let token = mint_test_token(user_id, username, &self.state.security);
        let mut client =
            WebSocketClient::connect_retry(&self.ws_url(&token), Duration::from_secs(1)).await?;
        let hello = client.expect_type("connected").await?;
        assert_eq!(hello["user_id"], user_id);
        Ok(client)
    }

    pub async fn shutdown(self) {
        self.handle.stop(true).await;
        let _ = self.join.await;
    }
}

pub async fn wait_for_connections(
    hub: &SessionHub,
    expected: usize,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = tokio::time::Instant::now();
    loop {
        if hub.connection_count() == expected {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(format!(
                "timeout waiting for connection_count == {expected} (got {})",
                hub.connection_count()
            )
            .into());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Start a real HTTP server on a random port with the production routes.
pub async fn start_test_server(state: AppState) -> Result<TestServer, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let data = web::Data::new(state.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    let join = tokio::spawn(server);

    Ok(TestServer {
        handle,
        addr,
        join,
        state,
    })
}
