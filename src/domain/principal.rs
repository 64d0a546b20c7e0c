//! Authenticated caller and the authorization rule set.
//!
//! The whole policy reduces to: an operation is permitted when the caller
//! holds the required role, owns the target resource, or is an admin.
//! Admins pass every check.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

use super::UserRole;

/// The authenticated caller, extracted from a verified JWT.
#[derive(Clone, Debug)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl Principal {
    /// Check if the caller has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the caller owns the given resource.
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.id == owner_id
    }
}

/// True when a caller with `role` may perform an operation restricted to
/// `required` (admins always may).
pub fn has_role(role: UserRole, required: UserRole) -> bool {
    role.is_admin() || role == required
}

/// True when a caller may mutate a resource: owners and admins only.
pub fn may_mutate(role: UserRole, is_owner: bool) -> bool {
    role.is_admin() || is_owner
}

/// Require the given role, admins pass.
pub fn ensure_role(principal: &Principal, required: UserRole) -> AppResult<()> {
    if has_role(principal.role, required) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require ownership of the resource, admins pass.
pub fn ensure_owner(principal: &Principal, owner_id: Uuid) -> AppResult<()> {
    if may_mutate(principal.role, principal.owns(owner_id)) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require admin privileges.
pub fn ensure_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            username: "test".into(),
            role,
        }
    }

    #[test]
    fn admin_passes_every_role_check() {
        for required in [UserRole::Author, UserRole::Reviewer, UserRole::Other] {
            assert!(has_role(UserRole::Admin, required));
        }
    }

    #[test]
    fn role_check_requires_exact_role_for_non_admins() {
        assert!(has_role(UserRole::Author, UserRole::Author));
        assert!(!has_role(UserRole::Reviewer, UserRole::Author));
        assert!(!has_role(UserRole::Other, UserRole::Author));
        assert!(!has_role(UserRole::Author, UserRole::Reviewer));
    }

    #[test]
    fn mutation_requires_ownership_or_admin() {
        assert!(may_mutate(UserRole::Other, true));
        assert!(may_mutate(UserRole::Admin, false));
        assert!(!may_mutate(UserRole::Author, false));
        assert!(!may_mutate(UserRole::Reviewer, false));
    }

    #[test]
    fn ensure_owner_rejects_strangers() {
        let caller = principal(UserRole::Reviewer);
        assert!(ensure_owner(&caller, caller.id).is_ok());

        let result = ensure_owner(&caller, Uuid::new_v4());
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn ensure_owner_lets_admin_through() {
        let caller = principal(UserRole::Admin);
        assert!(ensure_owner(&caller, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn ensure_role_maps_to_forbidden() {
        let caller = principal(UserRole::Other);
        let result = ensure_role(&caller, UserRole::Reviewer);
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
