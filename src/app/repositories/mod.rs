//! Unit-of-work repository contract.
//!
//! Every write takes the request's [`UnitOfWork`](crate::app::unit_of_work::UnitOfWork)
//! and an `Option<CommitPolicy>`. `None` lets the handle decide: writes made
//! while an atomic unit is open defer to it, all others commit before
//! returning. Reads run on the unit's connection, so they see rows the same
//! unit wrote earlier.

pub mod agents;
pub mod organizations;
pub mod security_roles;
pub mod workflows;
