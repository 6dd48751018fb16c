mod dev_organization;
mod system_roles;

pub use system_roles::builtin_role;

use async_trait::async_trait;
use sqlx::SqlitePool;

/// Outcome of running a seed. Skipped seeds are not recorded so they may run again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Seed executed and made changes; record in _controltower_seeds.
    Applied,
    /// Seed chose not to run (e.g. env not set); do not record.
    Skipped,
}

/// A database seed. Seeds run in version order and are tracked for idempotency.
#[async_trait]
pub trait Seed: Send + Sync {
    /// Unique version identifier (timestamp format: YYYYMMDDHHMMSS).
    fn version(&self) -> i64;

    /// Human-readable description of the seed.
    fn description(&self) -> &str;

    /// Execute the seed through the db layer. Must be idempotent.
    /// Return Skipped when the seed opts out (e.g. missing env); it will not be recorded.
    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error>;
}

/// All seeds in execution order (sorted by version).
pub fn all_seeds() -> Vec<Box<dyn Seed>> {
    let mut seeds: Vec<Box<dyn Seed>> = vec![
        Box::new(system_roles::SystemRoles),
        Box::new(dev_organization::DevOrganization),
    ];
    seeds.sort_by_key(|s| s.version());
    seeds
}

/// Run all pending seeds using the given pool. Use this when the app is already
/// running so seeds share the app's connection pool instead of opening new ones.
pub async fn run_seeds(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    ensure_seeds_table(pool).await?;
    let applied = applied_versions(pool).await?;
    for seed in all_seeds() {
        let version = seed.version();
        let description = seed.description();
        if applied.contains(&version) {
            continue;
        }
        match seed.run(pool).await? {
            SeedOutcome::Applied => record_seed(pool, version, description).await?,
            SeedOutcome::Skipped => {}
        }
    }
    Ok(())
}

pub async fn ensure_seeds_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _controltower_seeds (
            version INTEGER PRIMARY KEY NOT NULL,
            description TEXT NOT NULL,
            installed_on INTEGER NOT NULL DEFAULT (unixepoch()),
            success INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT version FROM _controltower_seeds")
        .fetch_all(pool)
        .await
}

pub async fn record_seed(
    pool: &SqlitePool,
    version: i64,
    description: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO _controltower_seeds (version, description) VALUES (?, ?)")
        .bind(version)
        .bind(description)
        .execute(pool)
        .await?;
    Ok(())
}

/// Forget that a seed ran, so it runs again.
pub async fn forget_seed(pool: &SqlitePool, version: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM _controltower_seeds WHERE version = ?")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}
