//! All-or-nothing execution of an ordered list of steps.

use futures::future::BoxFuture;
use sqlx::SqlitePool;
use ulid::Ulid;

use super::UnitOfWork;
use crate::app::error::{AppError, ErrorKind};

/// One operation of an atomic unit. It receives the unit's handle; every
/// repository call made through it defers its commit to the unit.
pub type Step<'a, T> =
    Box<dyn for<'u> FnOnce(&'u mut UnitOfWork) -> BoxFuture<'u, Result<T, AppError>> + Send + 'a>;

/// Box a closure as a [`Step`]. Lets closure signatures be inferred at the call site:
///
/// ```ignore
/// step(move |uow| Box::pin(async move { repositories::agents::create(uow, &agent, None).await }))
/// ```
pub fn step<'a, T, F>(f: F) -> Step<'a, T>
where
    F: for<'u> FnOnce(&'u mut UnitOfWork) -> BoxFuture<'u, Result<T, AppError>> + Send + 'a,
{
    Box::new(f)
}

/// Lifecycle of one `execute_atomic` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Idle,
    Active,
    Committing,
    RollingBack,
    Closed,
}

/// Runs steps under a single commit/rollback boundary.
#[derive(Clone)]
pub struct AtomicOrchestrator {
    pool: SqlitePool,
}

impl AtomicOrchestrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Execute `steps` in order inside one transaction and return the last
    /// step's result. Any failure rolls back every write made by the call.
    pub async fn execute_atomic<T: Send>(&self, steps: Vec<Step<'_, T>>) -> Result<T, AppError> {
        if steps.is_empty() {
            return Err(AppError::InvalidData(
                "atomic unit requires at least one step".to_string(),
            ));
        }
        AtomicRun::new(UnitOfWork::new(self.pool.clone()))
            .execute(steps)
            .await
    }
}

/// State for a single call; never reused.
struct AtomicRun {
    id: Ulid,
    state: UnitState,
    uow: UnitOfWork,
}

impl AtomicRun {
    fn new(uow: UnitOfWork) -> Self {
        Self {
            id: Ulid::new(),
            state: UnitState::Idle,
            uow,
        }
    }

    fn transition(&mut self, next: UnitState) {
        tracing::debug!(unit = %self.id, from = ?self.state, to = ?next, "atomic unit transition");
        self.state = next;
    }

    async fn execute<T: Send>(mut self, steps: Vec<Step<'_, T>>) -> Result<T, AppError> {
        let step_count = steps.len();
        if let Err(err) = self.uow.begin().await {
            tracing::debug!(unit = %self.id, "atomic unit could not open its session");
            self.transition(UnitState::Closed);
            return Err(self.report(AppError::from(err)));
        }
        let guard = self.uow.context().activate();
        self.transition(UnitState::Active);

        let result = match self.run_steps(steps).await {
            Ok(value) => {
                self.transition(UnitState::Committing);
                match self.uow.commit().await {
                    Ok(()) => {
                        tracing::debug!(unit = %self.id, steps = step_count, "atomic unit committed");
                        Ok(value)
                    }
                    Err(err) => Err(AppError::from(err)),
                }
            }
            Err(err) => {
                self.transition(UnitState::RollingBack);
                if let Err(rollback_err) = self.uow.rollback().await {
                    tracing::error!(unit = %self.id, %rollback_err, "atomic unit rollback failed");
                }
                Err(err)
            }
        };

        drop(guard);
        self.transition(UnitState::Closed);
        result.map_err(|err| self.report(err.classified()))
    }

    async fn run_steps<T: Send>(&mut self, steps: Vec<Step<'_, T>>) -> Result<T, AppError> {
        let mut last = None;
        for (index, step) in steps.into_iter().enumerate() {
            match step(&mut self.uow).await {
                Ok(value) => last = Some(value),
                Err(err) => {
                    tracing::debug!(unit = %self.id, step = index, "atomic unit step failed");
                    return Err(err);
                }
            }
        }
        last.ok_or_else(|| AppError::Internal("atomic unit ran no steps".to_string()))
    }

    fn report(&self, err: AppError) -> AppError {
        match err.kind() {
            ErrorKind::Conflict => {
                tracing::warn!(unit = %self.id, %err, "conflict during atomic operation")
            }
            ErrorKind::IntegrityViolation => {
                tracing::error!(unit = %self.id, %err, "integrity error during atomic operation")
            }
            ErrorKind::InvalidData => {
                tracing::error!(unit = %self.id, %err, "invalid data during atomic operation")
            }
            ErrorKind::Unexpected => {
                tracing::error!(unit = %self.id, %err, "unexpected error during atomic operation")
            }
            _ => tracing::warn!(unit = %self.id, %err, "atomic operation rejected"),
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::unit_of_work::CommitPolicy;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::{Arc, Mutex};

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE items (id TEXT PRIMARY KEY NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn insert(uow: &mut UnitOfWork, id: &str) -> Result<String, AppError> {
        let policy = uow.resolve_policy(None);
        let conn = uow.connection().await?;
        let result = sqlx::query("INSERT INTO items (id) VALUES (?)")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map(|_| id.to_string())
            .map_err(AppError::from);
        uow.settle(policy, result).await
    }

    async fn ids(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar("SELECT id FROM items ORDER BY id")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn commits_all_steps_and_returns_last_result() {
        let pool = pool().await;
        let orchestrator = AtomicOrchestrator::new(pool.clone());

        let last = orchestrator
            .execute_atomic(vec![
                step(|uow| Box::pin(async move { insert(uow, "a").await })),
                step(|uow| Box::pin(async move { insert(uow, "b").await })),
            ])
            .await
            .unwrap();

        assert_eq!(last, "b");
        assert_eq!(ids(&pool).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn failing_step_rolls_back_earlier_steps() {
        let pool = pool().await;
        let orchestrator = AtomicOrchestrator::new(pool.clone());

        let err = orchestrator
            .execute_atomic(vec![
                step(|uow| Box::pin(async move { insert(uow, "a").await })),
                step(|uow| Box::pin(async move { insert(uow, "a").await })),
            ])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::IntegrityViolation);
        assert!(ids(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn steps_run_in_order_and_see_context_active() {
        let pool = pool().await;
        let orchestrator = AtomicOrchestrator::new(pool.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let steps: Vec<Step<'_, ()>> = (0..3)
            .map(|i| {
                let seen = seen.clone();
                step(move |uow| {
                    Box::pin(async move {
                        assert!(uow.context().is_active());
                        assert_eq!(uow.resolve_policy(None), CommitPolicy::Deferred);
                        seen.lock().unwrap().push(i);
                        Ok(())
                    })
                })
            })
            .collect();

        orchestrator.execute_atomic(steps).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn business_error_is_surfaced_unchanged_after_rollback() {
        let pool = pool().await;
        let orchestrator = AtomicOrchestrator::new(pool.clone());

        let err = orchestrator
            .execute_atomic(vec![
                step(|uow| Box::pin(async move { insert(uow, "a").await })),
                step(|_uow| {
                    Box::pin(async move { Err::<String, _>(AppError::Conflict("taken".into())) })
                }),
            ])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(ids(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn session_that_cannot_open_is_reported_as_unexpected() {
        let pool = pool().await;
        let orchestrator = AtomicOrchestrator::new(pool.clone());
        pool.close().await;

        let err = orchestrator
            .execute_atomic(vec![step(|uow| Box::pin(async move { insert(uow, "a").await }))])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[tokio::test]
    async fn empty_unit_is_rejected() {
        let orchestrator = AtomicOrchestrator::new(pool().await);
        let err = orchestrator
            .execute_atomic::<()>(Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
