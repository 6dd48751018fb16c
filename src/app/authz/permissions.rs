//! Compile-time permission markers for [`super::Authorized`].

/// A `(resource, action)` pair a handler requires.
pub trait Permission: Send + Sync + 'static {
    const RESOURCE: &'static str;
    const ACTION: &'static str;
}

macro_rules! permission {
    ($(#[$meta:meta])* $name:ident => $resource:literal, $action:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Permission for $name {
            const RESOURCE: &'static str = $resource;
            const ACTION: &'static str = $action;
        }
    };
}

permission!(ReadAgents => "agents", "read");
permission!(CreateAgents => "agents", "create");
permission!(DeleteAgents => "agents", "delete");
permission!(ReadWorkflows => "workflows", "read");
permission!(CreateWorkflows => "workflows", "create");
permission!(ReadRoles => "roles", "read");
permission!(CreateRoles => "roles", "create");
permission!(ReadMembers => "members", "read");
permission!(CreateMembers => "members", "create");
permission!(DeleteMembers => "members", "delete");
