//! Role based access control for API resources.
//!
//! Resources ask an injected [`Acl`] whether a role may exercise a privilege on
//! them. An ACL that does not know a resource imposes no restriction on it.
//!
//! # Example
//!
//! ```rust
//! use customer_resource::acl::{Acl, Privilege, StaticAcl};
//!
//! let acl = StaticAcl::new()
//!     .with_resource("customer")
//!     .allow("support", "customer", [Privilege::Read]);
//!
//! assert!(acl.is_allowed("support", "customer", Privilege::Read));
//! assert!(!acl.is_allowed("support", "customer", Privilege::Delete));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Operation class guarded by the ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    Read,
    Create,
    Update,
    Delete,
}

impl Privilege {
    pub const ALL: [Privilege; 4] = [
        Privilege::Read,
        Privilege::Create,
        Privilege::Update,
        Privilege::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::Read => "read",
            Privilege::Create => "create",
            Privilege::Update => "update",
            Privilege::Delete => "delete",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization checker injected into resources.
pub trait Acl: Send + Sync {
    /// Whether the ACL knows the resource at all.
    fn has(&self, resource: &str) -> bool;

    /// Whether `role` holds `privilege` on `resource`.
    fn is_allowed(&self, role: &str, resource: &str, privilege: Privilege) -> bool;
}

/// In-process ACL built from explicit grants.
///
/// Roles listed via [`with_superuser`](Self::with_superuser) hold every
/// privilege on every registered resource.
#[derive(Debug, Clone, Default)]
pub struct StaticAcl {
    resources: HashSet<String>,
    // role -> resource -> privileges
    grants: HashMap<String, HashMap<String, HashSet<Privilege>>>,
    superusers: HashSet<String>,
}

impl StaticAcl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource so that checks against it are enforced.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.insert(resource.into());
        self
    }

    /// Grant privileges on a resource to a role.
    pub fn allow(
        mut self,
        role: impl Into<String>,
        resource: impl Into<String>,
        privileges: impl IntoIterator<Item = Privilege>,
    ) -> Self {
        self.grants
            .entry(role.into())
            .or_default()
            .entry(resource.into())
            .or_default()
            .extend(privileges);
        self
    }

    /// Let a role bypass per-resource grants.
    pub fn with_superuser(mut self, role: impl Into<String>) -> Self {
        self.superusers.insert(role.into());
        self
    }

    /// Withdraw a privilege previously granted.
    pub fn deny(&mut self, role: &str, resource: &str, privilege: Privilege) {
        if let Some(privileges) = self
            .grants
            .get_mut(role)
            .and_then(|resources| resources.get_mut(resource))
        {
            privileges.remove(&privilege);
        }
    }
}

impl Acl for StaticAcl {
    fn has(&self, resource: &str) -> bool {
        self.resources.contains(resource)
    }

    fn is_allowed(&self, role: &str, resource: &str, privilege: Privilege) -> bool {
        if self.superusers.contains(role) {
            return true;
        }

        self.grants
            .get(role)
            .and_then(|resources| resources.get(resource))
            .is_some_and(|privileges| privileges.contains(&privilege))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_are_per_role_and_resource() {
        let acl = StaticAcl::new()
            .with_resource("customer")
            .with_resource("order")
            .allow("support", "customer", [Privilege::Read, Privilege::Update]);

        assert!(acl.has("customer"));
        assert!(!acl.has("article"));

        assert!(acl.is_allowed("support", "customer", Privilege::Read));
        assert!(acl.is_allowed("support", "customer", Privilege::Update));
        assert!(!acl.is_allowed("support", "customer", Privilege::Delete));
        assert!(!acl.is_allowed("support", "order", Privilege::Read));
        assert!(!acl.is_allowed("guest", "customer", Privilege::Read));
    }

    #[test]
    fn test_superuser() {
        let acl = StaticAcl::new()
            .with_resource("customer")
            .with_superuser("local_admins");

        for privilege in Privilege::ALL {
            assert!(acl.is_allowed("local_admins", "customer", privilege));
        }
    }

    #[test]
    fn test_deny_withdraws_grant() {
        let mut acl = StaticAcl::new()
            .with_resource("customer")
            .allow("support", "customer", Privilege::ALL);

        acl.deny("support", "customer", Privilege::Delete);
        assert!(!acl.is_allowed("support", "customer", Privilege::Delete));
        assert!(acl.is_allowed("support", "customer", Privilege::Create));

        // Unknown role is a no-op
        acl.deny("nobody", "customer", Privilege::Read);
    }

    #[test]
    fn test_privilege_serde() {
        let json = serde_json::to_string(&Privilege::Update).unwrap();
        assert_eq!(json, "\"update\"");
        let parsed: Privilege = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(parsed, Privilege::Delete);
    }
}
