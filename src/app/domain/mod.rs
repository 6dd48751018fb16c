pub mod identifier;
pub mod organization_id;
pub mod organization_role;
pub mod permission_bundle;
pub mod role_name;
pub mod user_id;

pub use identifier::IdentifierError;
pub use organization_id::OrganizationId;
pub use organization_role::{OrganizationRole, OrganizationStatus, RoleScope};
pub use permission_bundle::PermissionBundle;
pub use role_name::{RoleName, RoleNameError};
pub use user_id::UserId;
