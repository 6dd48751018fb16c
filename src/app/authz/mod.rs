//! Authorization: who the caller is inside a tenant and what they may do.
//!
//! Handlers never call the gate directly; they take an [`Authorized<P>`]
//! extractor naming the permission they need.

pub mod extract;
pub mod gate;
pub mod permissions;
pub mod resolver;

pub use extract::{Authenticated, Authorized, TenantMember};
pub use gate::PermissionGate;
pub use permissions::Permission;
pub use resolver::{Membership, RoleResolver};
