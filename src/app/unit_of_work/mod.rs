//! Unit-of-work handle and the request-scoped transaction signal.
//!
//! A [`UnitOfWork`] is created per request and threaded explicitly through
//! every repository call. It carries a [`TransactionContext`] telling writes
//! whether an atomic unit is open. Writes resolve their [`CommitPolicy`]
//! against that context: inside an open unit they flush to the unit's
//! transaction and leave committing to the [`AtomicOrchestrator`]; outside
//! one they commit before returning.

pub mod orchestrator;

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::app::error::AppError;

/// Units take the write lock when they open; overlapping units queue on the
/// busy timeout.
const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

pub use orchestrator::{step, AtomicOrchestrator, Step, UnitState};

/// Whether a write commits on its own or joins the enclosing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Commit before the write returns.
    Immediate,
    /// Flush into the open unit; the unit commits or rolls back later.
    Deferred,
}

/// "Atomic unit active" flag for one request.
///
/// Clones share the flag, so independently constructed components of the
/// same request observe the same value. Separate requests never share one.
#[derive(Debug, Clone, Default)]
pub struct TransactionContext {
    active: Arc<AtomicBool>,
}

impl TransactionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    /// Default policy for writes that do not ask for one.
    pub fn commit_policy(&self) -> CommitPolicy {
        if self.is_active() {
            CommitPolicy::Deferred
        } else {
            CommitPolicy::Immediate
        }
    }

    /// Mark the context active until the returned guard is dropped.
    pub fn activate(&self) -> ActiveGuard {
        self.set_active(true);
        ActiveGuard {
            context: self.clone(),
        }
    }
}

/// Clears the context on drop, on every exit path including cancellation.
#[must_use = "the context is deactivated as soon as the guard is dropped"]
pub struct ActiveGuard {
    context: TransactionContext,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.context.set_active(false);
    }
}

/// Request-scoped persistence session.
///
/// Holds at most one open transaction. Writes obtain it through
/// [`UnitOfWork::connection`] (opening it lazily) and hand their outcome to
/// [`UnitOfWork::settle`], which commits or rolls back only for
/// [`CommitPolicy::Immediate`].
pub struct UnitOfWork {
    pool: SqlitePool,
    tx: Option<Transaction<'static, Sqlite>>,
    context: TransactionContext,
}

impl UnitOfWork {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            tx: None,
            context: TransactionContext::new(),
        }
    }

    pub fn context(&self) -> &TransactionContext {
        &self.context
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn has_open_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Resolve the policy for one write. An explicit `Immediate` inside an
    /// active unit is downgraded: committing there would publish half a unit.
    pub fn resolve_policy(&self, requested: Option<CommitPolicy>) -> CommitPolicy {
        let derived = self.context.commit_policy();
        match (requested, derived) {
            (Some(CommitPolicy::Immediate), CommitPolicy::Deferred) => {
                tracing::warn!("immediate commit requested inside an atomic unit; deferring");
                CommitPolicy::Deferred
            }
            (Some(policy), _) => policy,
            (None, derived) => derived,
        }
    }

    /// Open the transaction if needed. Called by the orchestrator on entry.
    pub async fn begin(&mut self) -> Result<(), sqlx::Error> {
        if self.tx.is_none() {
            self.tx = Some(self.pool.begin_with(BEGIN_IMMEDIATE).await?);
        }
        Ok(())
    }

    /// Connection for writes. Statements run here are flushed but not committed.
    pub async fn connection(&mut self) -> Result<&mut SqliteConnection, sqlx::Error> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin_with(BEGIN_IMMEDIATE).await?,
        };
        Ok(&mut **self.tx.insert(tx))
    }

    /// Connection for reads. Reuses the open transaction so in-flight writes
    /// of this unit are visible; otherwise borrows a pooled connection.
    pub async fn reader(&mut self) -> Result<Reader<'_>, sqlx::Error> {
        match self.tx.as_mut() {
            Some(tx) => Ok(Reader::InUnit(&mut **tx)),
            None => Ok(Reader::Pooled(self.pool.acquire().await?)),
        }
    }

    /// Finish one write according to its resolved policy.
    pub async fn settle<T>(
        &mut self,
        policy: CommitPolicy,
        result: Result<T, AppError>,
    ) -> Result<T, AppError> {
        if policy == CommitPolicy::Deferred {
            return result;
        }
        let Some(tx) = self.tx.take() else {
            return result;
        };
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(%rollback_err, "rollback after failed write");
                }
                Err(err)
            }
        }
    }

    /// Commit everything flushed so far.
    pub async fn commit(&mut self) -> Result<(), sqlx::Error> {
        match self.tx.take() {
            Some(tx) => tx.commit().await,
            None => Ok(()),
        }
    }

    /// Discard everything flushed so far.
    pub async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        match self.tx.take() {
            Some(tx) => tx.rollback().await,
            None => Ok(()),
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        // sqlx rolls the transaction back when it is dropped.
        if self.tx.is_some() {
            tracing::warn!("unit of work dropped with uncommitted writes; rolling back");
        }
    }
}

/// Read connection handed out by [`UnitOfWork::reader`].
pub enum Reader<'a> {
    InUnit(&'a mut SqliteConnection),
    Pooled(PoolConnection<Sqlite>),
}

impl Deref for Reader<'_> {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        match self {
            Reader::InUnit(conn) => &**conn,
            Reader::Pooled(conn) => &**conn,
        }
    }
}

impl DerefMut for Reader<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Reader::InUnit(conn) => &mut **conn,
            Reader::Pooled(conn) => &mut **conn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

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

    async fn insert(uow: &mut UnitOfWork, id: &str, policy: Option<CommitPolicy>) -> Result<(), AppError> {
        let policy = uow.resolve_policy(policy);
        let conn = uow.connection().await?;
        let result = sqlx::query("INSERT INTO items (id) VALUES (?)")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map(|_| ())
            .map_err(AppError::from);
        uow.settle(policy, result).await
    }

    async fn count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM items")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn context_defaults_to_inactive_and_guard_clears_it() {
        let context = TransactionContext::new();
        assert!(!context.is_active());
        assert_eq!(context.commit_policy(), CommitPolicy::Immediate);
        {
            let _guard = context.activate();
            assert!(context.is_active());
            assert_eq!(context.commit_policy(), CommitPolicy::Deferred);
        }
        assert!(!context.is_active());
    }

    #[test]
    fn contexts_of_different_units_are_independent() {
        let a = TransactionContext::new();
        let b = TransactionContext::new();
        let shared = a.clone();
        a.set_active(true);
        assert!(shared.is_active());
        assert!(!b.is_active());
    }

    #[tokio::test]
    async fn immediate_write_commits_before_returning() {
        let pool = pool().await;
        let mut uow = UnitOfWork::new(pool.clone());
        insert(&mut uow, "a", None).await.unwrap();
        assert!(!uow.has_open_transaction());
        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn failed_immediate_write_rolls_back() {
        let pool = pool().await;
        let mut uow = UnitOfWork::new(pool.clone());
        insert(&mut uow, "a", None).await.unwrap();
        let err = insert(&mut uow, "a", None).await.unwrap_err();
        assert_eq!(err.kind(), crate::app::error::ErrorKind::IntegrityViolation);
        assert!(!uow.has_open_transaction());
        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn explicit_immediate_is_deferred_inside_active_unit() {
        let pool = pool().await;
        let mut uow = UnitOfWork::new(pool.clone());
        let guard = uow.context().activate();
        assert_eq!(uow.resolve_policy(Some(CommitPolicy::Immediate)), CommitPolicy::Deferred);
        insert(&mut uow, "a", Some(CommitPolicy::Immediate)).await.unwrap();
        assert!(uow.has_open_transaction());

        let seen: i64 = {
            let mut reader = uow.reader().await.unwrap();
            sqlx::query_scalar("SELECT count(*) FROM items")
                .fetch_one(&mut *reader)
                .await
                .unwrap()
        };
        assert_eq!(seen, 1);

        uow.rollback().await.unwrap();
        drop(guard);
        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn explicit_deferred_write_waits_for_commit() {
        let pool = pool().await;
        let mut uow = UnitOfWork::new(pool.clone());
        insert(&mut uow, "a", Some(CommitPolicy::Deferred)).await.unwrap();
        assert!(uow.has_open_transaction());
        uow.commit().await.unwrap();
        assert_eq!(count(&pool).await, 1);
    }
}
