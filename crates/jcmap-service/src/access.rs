//! Role gate shared by the gated operations.

use jcmap_core::error::{JcmapError, JcmapResult};
use jcmap_core::models::user::{Principal, UserRole};

/// Reject the principal unless its role is in the allowed set.
pub fn require_role(principal: &Principal, allowed: &[UserRole]) -> JcmapResult<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(JcmapError::AuthorizationDenied {
            reason: format!("role '{}' is not permitted here", principal.role.as_str()),
        })
    }
}
