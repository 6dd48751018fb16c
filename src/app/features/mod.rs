pub mod agents;
pub mod health;
pub mod organizations;
pub mod roles;
pub mod workflows;
