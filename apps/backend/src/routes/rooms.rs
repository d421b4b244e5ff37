//! Room HTTP routes. In-game actions travel over the websocket.

use actix_web::{web, HttpResponse};

use crate::domain::RoomOptions;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::services::Caller;
use crate::state::app_state::AppState;

/// POST /api/rooms
///
/// Creates a room hosted by the caller and seats them. Responds `201` with the
/// caller's snapshot.
async fn create_room(
    current_user: CurrentUser,
    body: web::Json<RoomOptions>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let caller: Caller = current_user.into();
    let snapshot = app_state.flow.create_room(&caller, body.into_inner())?;
    Ok(HttpResponse::Created().json(snapshot))
}

/// GET /api/rooms
///
/// Public rooms still accepting players.
async fn list_rooms(
    _current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.flow.list_rooms()))
}

/// GET /api/rooms/current
async fn current_room(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.flow.current_room(current_user.id)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_room))
            .route(web::get().to(list_rooms)),
    );
    cfg.service(web::resource("/current").route(web::get().to(current_room)));
}
