use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Mapping from resource name to the set of actions allowed on it.
///
/// Serialized as `{"workflows": ["read", "create"]}`, the shape stored in
/// `security_roles.permissions`. Resource and action names are compared exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionBundle(BTreeMap<String, BTreeSet<String>>);

impl PermissionBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style grant, used by seeds and tests.
    pub fn with(mut self, resource: &str, actions: &[&str]) -> Self {
        self.grant(resource, actions.iter().copied());
        self
    }

    pub fn grant<'a>(&mut self, resource: &str, actions: impl IntoIterator<Item = &'a str>) {
        self.0
            .entry(resource.to_string())
            .or_default()
            .extend(actions.into_iter().map(str::to_string));
    }

    /// Whether `action` is allowed on `resource`.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.0
            .get(resource)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Per-resource set union.
    pub fn merge(&mut self, other: PermissionBundle) {
        for (resource, actions) in other.0 {
            self.0.entry(resource).or_default().extend(actions);
        }
    }

    pub fn actions(&self, resource: &str) -> impl Iterator<Item = &str> {
        self.0.get(resource).into_iter().flatten().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Parse the JSON stored in the role table.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> String {
        // A map of string sets always serializes.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_only_granted_pairs() {
        let bundle = PermissionBundle::new().with("workflows", &["read"]);
        assert!(bundle.allows("workflows", "read"));
        assert!(!bundle.allows("workflows", "create"));
        assert!(!bundle.allows("agents", "read"));
    }

    #[test]
    fn empty_bundle_denies_everything() {
        let bundle = PermissionBundle::new();
        assert!(bundle.is_empty());
        assert!(!bundle.allows("agents", "read"));
    }

    #[test]
    fn merge_is_a_per_resource_union() {
        let mut system = PermissionBundle::new()
            .with("agents", &["read"])
            .with("workflows", &["read"]);
        let org = PermissionBundle::new()
            .with("agents", &["create", "read"])
            .with("rag", &["read"]);
        system.merge(org);

        assert_eq!(system.actions("agents").collect::<Vec<_>>(), vec!["create", "read"]);
        assert!(system.allows("workflows", "read"));
        assert!(system.allows("rag", "read"));
    }

    #[test]
    fn json_shape_matches_storage() {
        let bundle = PermissionBundle::from_json(r#"{"workflows":["read","create"]}"#).unwrap();
        assert!(bundle.allows("workflows", "create"));
        assert_eq!(bundle.to_json(), r#"{"workflows":["create","read"]}"#);
    }
}
