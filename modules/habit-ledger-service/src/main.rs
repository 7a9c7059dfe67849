//! Habit Ledger Service — standalone binary for recording, listing,
//! deleting, and analyzing daily habit completions.
//!
//! Hosts the RPC API and a status dashboard.
//! Default: http://127.0.0.1:9205/

mod aggregate;
mod auth;
mod dashboard;
mod error;
mod ledger;
mod routes;
mod store;

use ledger::Ledger;
use routes::AppState;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let port: u16 = std::env::var("HABIT_LEDGER_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9205);

    let db_path = std::env::var("HABIT_LEDGER_DB_PATH")
        .unwrap_or_else(|_| "./habit_ledger.db".to_string());

    let owner = std::env::var("HABIT_LEDGER_OWNER").unwrap_or_else(|_| "admin".to_string());
    let password =
        std::env::var("HABIT_LEDGER_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    // Tokens from a previous run stop verifying when the secret is not
    // pinned via the environment.
    let secret = std::env::var("HABIT_LEDGER_JWT_SECRET")
        .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string());

    log::info!("Opening database at: {}", db_path);
    let database = Arc::new(store::Db::open(&db_path).expect("Failed to open database"));

    let auth_config =
        auth::AuthConfig::new(owner, &password, secret).expect("Failed to hash owner password");

    let state = Arc::new(AppState {
        ledger: Ledger::new(database),
        auth: auth_config,
        start_time: Instant::now(),
    });

    let cors = tower_http::cors::CorsLayer::permissive();

    // GET on :key lists a date's records; DELETE on :key removes by
    // habit id. The static suggestions route takes precedence.
    let app = axum::Router::new()
        .route("/", axum::routing::get(dashboard::dashboard))
        .route("/api/login", axum::routing::post(routes::login))
        .route("/api/habits", axum::routing::post(routes::create_habit))
        .route(
            "/api/habits/suggestions",
            axum::routing::get(routes::suggestions),
        )
        .route(
            "/api/habits/:key",
            axum::routing::get(routes::list_habits).delete(routes::delete_habit),
        )
        .route("/api/trends", axum::routing::get(routes::trends))
        .route("/api/status", axum::routing::get(routes::status))
        .with_state(state)
        .layer(cors);

    let addr = format!("127.0.0.1:{}", port);
    log::info!("Habit Ledger Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
