//! SQL statements, one module per table. Every function is generic over the
//! executor so it runs equally on the pool, a pooled connection or the open
//! transaction of a unit of work.

pub mod agents;
pub mod organizations;
pub mod security_roles;
pub mod workflows;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};

pub use agents::{Agent, NewAgent};
pub use organizations::{Member, MembershipSummary, NewOrganization, Organization};
pub use security_roles::{NewSecurityRole, SecurityRole};
pub use workflows::{NewWorkflow, Workflow};

/// How long a connection waits for another writer before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Options applied to every pooled connection: WAL journal and a busy
/// timeout, so `BEGIN IMMEDIATE` queues behind the current writer.
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT))
}
