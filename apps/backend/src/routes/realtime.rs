use actix_web::web;

use crate::ws::upgrade;

/// GET /api/ws?token=<jwt>
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(upgrade)));
}
