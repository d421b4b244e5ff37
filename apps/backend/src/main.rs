use actix_web::{web, App, HttpServer};
use wizz_backend::config::decks::load_deck_catalog;
use wizz_backend::config::server::ServerConfig;
use wizz_backend::middleware::cors::cors_middleware;
use wizz_backend::middleware::request_trace::RequestTrace;
use wizz_backend::middleware::structured_logger::StructuredLogger;
use wizz_backend::routes;
use wizz_backend::state::app_state::AppState;
use wizz_backend::state::security_config::SecurityConfig;
use wizz_backend::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.detail());
            std::process::exit(1);
        }
    };

    let decks = match load_deck_catalog(config.decks_dir.as_deref()) {
        Ok(decks) => decks,
        Err(e) => {
            eprintln!("❌ Failed to load decks: {}", e.detail());
            std::process::exit(1);
        }
    };
    tracing::info!(decks = decks.len(), "deck catalog loaded");

    let security_config = SecurityConfig::new(config.jwt_secret.as_bytes());
    let data = web::Data::new(AppState::new(decks, security_config));

    println!(
        "🚀 Starting Wizz Backend on http://{}:{}",
        config.host, config.port
    );

    let cors_origins = config.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
