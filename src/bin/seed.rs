use controltower::app;
use controltower::seeds;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = app::config::Config::from_env()
        .expect("Failed to load config (check DATABASE_URL and other env vars)");

    let options = app::db::connect_options(&config.database_url)
        .expect("Invalid DATABASE_URL");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    seeds::ensure_seeds_table(&pool)
        .await
        .expect("Failed to create _controltower_seeds table");

    let args: Vec<String> = env::args().collect();
    let force_all = args.iter().any(|a| a == "--force-all");
    let force_version = args
        .iter()
        .position(|a| a == "--force")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<i64>().ok());

    let applied = seeds::applied_versions(&pool)
        .await
        .expect("Failed to query applied seeds");

    for seed in seeds::all_seeds() {
        let version = seed.version();
        let description = seed.description();
        let already_applied = applied.contains(&version);
        let forced = force_all || force_version == Some(version);

        if !forced && already_applied {
            eprintln!("Skipping {} (already applied)", description);
            continue;
        }

        if forced && already_applied {
            seeds::forget_seed(&pool, version)
                .await
                .expect("Failed to remove seed from tracking for re-run");
        }

        eprintln!("Running {}...", description);
        let outcome = match seed.run(&pool).await {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Seed {} failed: {}", description, e);
                std::process::exit(1);
            }
        };

        match outcome {
            seeds::SeedOutcome::Applied => {
                seeds::record_seed(&pool, version, description)
                    .await
                    .expect("Failed to record seed success");
                eprintln!("Done {}", description);
            }
            seeds::SeedOutcome::Skipped => {
                eprintln!(
                    "Skipped {} (conditions not met, e.g. APP_ENV or DEV_OWNER_ID unset)",
                    description
                );
            }
        }
    }
}
