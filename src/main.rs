use controltower::{app, seeds};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (silently ignore if missing)
    dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug,tower_http=debug", env!("CARGO_PKG_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from environment
    let config = app::config::Config::from_env()
        .expect("Failed to load config (check DATABASE_URL and other env vars)");

    // Connect to SQLite; WAL and busy timeout apply to every pooled connection
    let options = app::db::connect_options(&config.database_url)
        .expect("Invalid DATABASE_URL");
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    // Run embedded migrations on startup
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // System roles must exist before the first authorization check
    seeds::run_seeds(&pool)
        .await
        .expect("Failed to run seeds");

    // Build the identity verifier from config
    let identity = app::identity::from_config(&config).unwrap_or_else(|e| {
        tracing::error!("Failed to initialize identity verifier: {}", e);
        std::process::exit(1);
    });

    tracing::info!(environment = %config.environment, "configuration loaded");
    let bind_addr = config.bind_addr.clone();

    // Build the application state
    let state = app::AppState::new(pool, config, identity);
    let router = controltower::create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", bind_addr, e));

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router).await.unwrap();
}
