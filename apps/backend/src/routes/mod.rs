use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Register every application route.
///
/// `main.rs` wraps these with CORS, logging and tracing middleware; tests
/// mount them bare so handlers can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Rooms: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // Realtime: /api/ws
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
