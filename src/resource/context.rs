//! Per-resource caller context: role, ACL and privilege checks.

use crate::acl::{Acl, Privilege};
use crate::error::{ApiError, ApiResult};
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

/// Who is calling a resource and which ACL judges them.
///
/// With no role or no ACL configured every operation is permitted, as is any
/// operation on a resource the ACL does not know.
#[derive(Clone, Default)]
pub struct ResourceContext {
    role: Option<String>,
    acl: Option<Arc<dyn Acl>>,
}

impl ResourceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_acl(mut self, acl: Arc<dyn Acl>) -> Self {
        self.acl = Some(acl);
        self
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = Some(role.into());
    }

    pub fn set_acl(&mut self, acl: Arc<dyn Acl>) {
        self.acl = Some(acl);
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn has_acl(&self) -> bool {
        self.acl.is_some()
    }

    /// Fail with [`ApiError::Privilege`] if the role may not perform `privilege`.
    pub fn check_privilege(&self, resource: &str, privilege: Privilege) -> ApiResult<()> {
        let (Some(role), Some(acl)) = (self.role.as_deref(), self.acl.as_ref()) else {
            return Ok(());
        };

        if !acl.has(resource) {
            debug!("ACL has no resource '{}', skipping check", resource);
            return Ok(());
        }

        if acl.is_allowed(role, resource, privilege) {
            debug!("Role '{}' granted '{}' on '{}'", role, privilege, resource);
            Ok(())
        } else {
            warn!("Role '{}' denied '{}' on '{}'", role, privilege, resource);
            Err(ApiError::Privilege {
                role: role.to_string(),
                resource: resource.to_string(),
                privilege,
            })
        }
    }
}

impl fmt::Debug for ResourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceContext")
            .field("role", &self.role)
            .field("acl", &self.acl.is_some())
            .finish()
    }
}
