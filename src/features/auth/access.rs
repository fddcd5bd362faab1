//! Authorization predicates shared by every feature.
//!
//! They are plain functions over `(actor role, actor province, target province)`
//! so handlers and services can reuse them without touching the database.

use super::model::Role;

/// Super-user or provincial supervisor. Gates user management,
/// duplicate review and zone administration.
pub fn is_super_tier(role: Role) -> bool {
    matches!(role, Role::SuperUser | Role::ProvincialSupervisor)
}

/// Whether an actor may see or act on records tied to `target_province`.
///
/// The super-user is global. Everyone else needs an assigned province equal
/// to the target; an unassigned actor or an unassigned target never matches.
pub fn owns_province(role: Role, actor_province: Option<i64>, target_province: Option<i64>) -> bool {
    if role == Role::SuperUser {
        return true;
    }

    matches!((actor_province, target_province), (Some(actor), Some(target)) if actor == target)
}

/// Whether an actor may hand out `target_role` when creating an account.
/// Only the super-user can mint another super-user.
pub fn can_assign_role(actor_role: Role, target_role: Role) -> bool {
    match actor_role {
        Role::SuperUser => true,
        Role::ProvincialSupervisor => target_role != Role::SuperUser,
        Role::FieldAgent => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_tier() {
        assert!(is_super_tier(Role::SuperUser));
        assert!(is_super_tier(Role::ProvincialSupervisor));
        assert!(!is_super_tier(Role::FieldAgent));
    }

    #[test]
    fn test_super_user_owns_every_province() {
        assert!(owns_province(Role::SuperUser, None, Some(3)));
        assert!(owns_province(Role::SuperUser, Some(1), Some(3)));
        assert!(owns_province(Role::SuperUser, None, None));
    }

    #[test]
    fn test_scoped_roles_need_matching_province() {
        for role in [Role::ProvincialSupervisor, Role::FieldAgent] {
            assert!(owns_province(role, Some(2), Some(2)));
            assert!(!owns_province(role, Some(2), Some(5)));
            assert!(!owns_province(role, None, Some(2)));
            assert!(!owns_province(role, Some(2), None));
            assert!(!owns_province(role, None, None));
        }
    }

    #[test]
    fn test_role_assignment() {
        assert!(can_assign_role(Role::SuperUser, Role::SuperUser));
        assert!(can_assign_role(Role::ProvincialSupervisor, Role::FieldAgent));
        assert!(can_assign_role(
            Role::ProvincialSupervisor,
            Role::ProvincialSupervisor
        ));
        assert!(!can_assign_role(Role::ProvincialSupervisor, Role::SuperUser));
        assert!(!can_assign_role(Role::FieldAgent, Role::FieldAgent));
    }
}
