use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{RoomKey, RoomSnapshot};
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::services::{Caller, GameFlowService};
use crate::state::app_state::AppState;
use crate::ws::hub::{RoomEvent, SessionHub};
use crate::ws::protocol::{ClientMsg, ServerMsg};
use crate::AppError;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(
        Uuid::new_v4(),
        current_user.into(),
        app_state.flow.clone(),
        app_state.hub.clone(),
    );
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    caller: Caller,
    flow: GameFlowService,
    hub: Arc<SessionHub>,
    last_heartbeat: Instant,
    /// Last snapshot pushed, for suppressing identical updates.
    last_sent: Option<RoomSnapshot>,
}

impl WsSession {
    fn new(conn_id: Uuid, caller: Caller, flow: GameFlowService, hub: Arc<SessionHub>) -> Self {
        Self {
            conn_id,
            caller,
            flow,
            hub,
            last_heartbeat: Instant::now(),
            last_sent: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(&self, ctx: &mut ws::WebsocketContext<Self>, action: &str, err: &AppError) {
        warn!(
            conn_id = %self.conn_id,
            user_id = self.caller.id,
            action,
            code = err.code().as_str(),
            detail = %err.detail(),
            "[WS SESSION] action rejected"
        );
        Self::send_json(ctx, &ServerMsg::error(err.code(), err.public_detail()));
    }

    fn send_error_and_close(&self, ctx: &mut ws::WebsocketContext<Self>, message: &str) {
        Self::send_json(ctx, &ServerMsg::error(ErrorCode::BadRequest, message));
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    /// Push the caller's projection of `key`. Unless `force`d, skips the push
    /// when nothing visible to this user changed.
    fn push_room(&mut self, ctx: &mut ws::WebsocketContext<Self>, key: RoomKey, force: bool) {
        let snapshot = match self.flow.snapshot(key, self.caller.id) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                if force {
                    self.send_error(ctx, "get-room", &err);
                }
                return;
            }
        };
        if !force && self.last_sent.as_ref() == Some(&snapshot) {
            return;
        }
        Self::send_json(
            ctx,
            &ServerMsg::Update {
                room: snapshot.clone(),
            },
        );
        self.last_sent = Some(snapshot);
    }

    fn dispatch(&mut self, ctx: &mut ws::WebsocketContext<Self>, msg: ClientMsg) {
        let user_id = self.caller.id;
        let action = msg.action();
        let result = match msg {
            ClientMsg::GetRoom => match self.flow.registry().room_of(user_id) {
                Some(key) => {
                    self.push_room(ctx, key, true);
                    Ok(())
                }
                None => self.flow.current_room(user_id).map(|_| ()),
            },
            ClientMsg::Join { key } => self.flow.join_room(&self.caller, key).map(|snapshot| {
                Self::send_json(
                    ctx,
                    &ServerMsg::Update {
                        room: snapshot.clone(),
                    },
                );
                self.last_sent = Some(snapshot);
            }),
            ClientMsg::Start => self.flow.start_game(user_id),
            ClientMsg::PlayCard { card_id } => self.flow.play_card(user_id, card_id),
            ClientMsg::FlipCard { card_id } => self.flow.flip_card(user_id, card_id),
            ClientMsg::VoteCard { card_id } => self.flow.vote_card(user_id, card_id),
            ClientMsg::Leave => self.flow.leave_room(user_id).map(|_| ()),
            ClientMsg::Delete => self.flow.delete_room(user_id).map(|_| ()),
        };
        if let Err(err) = result {
            self.send_error(ctx, action, &err);
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    user_id = actor.caller.id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            user_id = self.caller.id,
            "[WS SESSION] started"
        );
        self.hub.register(
            self.caller.id,
            self.conn_id,
            ctx.address().recipient::<RoomEvent>(),
        );
        self.start_heartbeat(ctx);

        Self::send_json(
            ctx,
            &ServerMsg::Connected {
                user_id: self.caller.id,
            },
        );
        if let Some(key) = self.flow.registry().room_of(self.caller.id) {
            self.push_room(ctx, key, false);
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if self.hub.unregister(self.caller.id, self.conn_id) {
            self.flow.disconnected(self.caller.id);
        }
        info!(
            conn_id = %self.conn_id,
            user_id = self.caller.id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.dispatch(ctx, cmd),
                    Err(_) => self.send_error_and_close(ctx, "Malformed message"),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    user_id = self.caller.id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<RoomEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: RoomEvent, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            RoomEvent::Changed { key, .. } => {
                if self.flow.registry().room_of(self.caller.id) == Some(key) {
                    self.push_room(ctx, key, false);
                }
            }
            RoomEvent::Left { key } => {
                self.last_sent = None;
                Self::send_json(ctx, &ServerMsg::Left { key });
            }
            RoomEvent::Closed { key } => {
                self.last_sent = None;
                Self::send_json(ctx, &ServerMsg::RoomClosed { key });
            }
            RoomEvent::Disconnected { user_id, .. } => {
                Self::send_json(ctx, &ServerMsg::Disconnected { user_id });
            }
        }
    }
}
