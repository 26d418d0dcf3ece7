//! Roles and the per-action permission gate.
//!
//! The permission table is fixed in code, not data-driven. The gate runs
//! before any query touches the target row; denial has no side effects.

use serde::{Deserialize, Serialize};

use crate::audit::EntityKind;
use crate::error::CoreError;

/// Role attached to an acting user. Stored and transported as its `as_str`
/// form (`"Admin"`, `"Producer"`, `"CSR"`, `"ReadOnly"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Producer,
    Csr,
    ReadOnly,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Producer => "Producer",
            Self::Csr => "CSR",
            Self::ReadOnly => "ReadOnly",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Producer" => Ok(Self::Producer),
            "CSR" => Ok(Self::Csr),
            "ReadOnly" => Ok(Self::ReadOnly),
            other => Err(CoreError::Validation(format!("Unknown role: {other}"))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutating action classes the gate decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Authorize `role` to perform `action` on `entity`.
///
/// Rules:
/// - ReadOnly is denied every Create/Update/Delete.
/// - Delete is only defined for Account, and only for Admin.
/// - Admin, Producer, and CSR may create/update everything else.
pub fn authorize(role: Role, action: Action, entity: EntityKind) -> Result<(), CoreError> {
    if role == Role::ReadOnly {
        return Err(CoreError::Forbidden(format!(
            "Read-only users cannot {} {} records",
            action.as_str(),
            entity.as_str(),
        )));
    }

    if action == Action::Delete {
        if entity != EntityKind::Account {
            return Err(CoreError::Forbidden(format!(
                "{} records cannot be deleted",
                entity.as_str(),
            )));
        }
        if role != Role::Admin {
            return Err(CoreError::Forbidden(
                "Only admins can delete accounts".into(),
            ));
        }
    }

    Ok(())
}

/// Producer read scope: Producers only see Accounts and Prospects where they
/// are the assigned producer. Returns the actor id to filter on, or `None`
/// when the role sees everything.
pub fn producer_scope(role: Role, actor_id: crate::types::DbId) -> Option<crate::types::DbId> {
    match role {
        Role::Producer => Some(actor_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Producer, Role::Csr, Role::ReadOnly] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("Superuser").is_err());
    }

    #[test]
    fn read_only_denied_every_mutation() {
        for action in [Action::Create, Action::Update, Action::Delete] {
            for entity in [
                EntityKind::Account,
                EntityKind::Prospect,
                EntityKind::Task,
                EntityKind::Note,
            ] {
                let result = authorize(Role::ReadOnly, action, entity);
                assert!(matches!(result, Err(CoreError::Forbidden(_))));
            }
        }
    }

    #[test]
    fn only_admin_deletes_accounts() {
        assert!(authorize(Role::Admin, Action::Delete, EntityKind::Account).is_ok());
        for role in [Role::Producer, Role::Csr, Role::ReadOnly] {
            let result = authorize(role, Action::Delete, EntityKind::Account);
            assert!(matches!(result, Err(CoreError::Forbidden(_))));
        }
    }

    #[test]
    fn delete_undefined_outside_accounts() {
        let result = authorize(Role::Admin, Action::Delete, EntityKind::Policy);
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn writers_may_create_and_update() {
        for role in [Role::Admin, Role::Producer, Role::Csr] {
            assert!(authorize(role, Action::Create, EntityKind::Contact).is_ok());
            assert!(authorize(role, Action::Update, EntityKind::ServiceItem).is_ok());
        }
    }

    #[test]
    fn only_producers_are_scoped() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(producer_scope(Role::Producer, id), Some(id));
        assert_eq!(producer_scope(Role::Admin, id), None);
        assert_eq!(producer_scope(Role::Csr, id), None);
        assert_eq!(producer_scope(Role::ReadOnly, id), None);
    }
}
