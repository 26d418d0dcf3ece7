//! Polymorphic entity linkage for notes, communication logs, and tasks.
//!
//! A `(kind, id)` pair referencing any entity type. The discriminator is
//! validated against [`EntityKind`], but the target row's existence is not
//! checked at write time; the link is application-level only, with no typed
//! foreign key in storage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::audit::EntityKind;
use crate::error::CoreError;
use crate::types::DbId;

/// A reference to any entity by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedEntity {
    pub kind: EntityKind,
    pub id: DbId,
}

impl LinkedEntity {
    /// Build a link from its stored `(linked_entity_type, linked_entity_id)`
    /// columns, rejecting unknown discriminators.
    pub fn from_columns(kind: &str, id: DbId) -> Result<Self, CoreError> {
        Ok(Self {
            kind: EntityKind::from_str(kind)?,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_discriminator_parses() {
        let id = uuid::Uuid::new_v4();
        let link = LinkedEntity::from_columns("Policy", id).unwrap();
        assert_eq!(link.kind, EntityKind::Policy);
        assert_eq!(link.id, id);
    }

    #[test]
    fn unknown_discriminator_fails_validation() {
        let result = LinkedEntity::from_columns("Spaceship", uuid::Uuid::new_v4());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}
