//! Composite entity identifiers
//!
//! A [`CommonId`] names an entity (schema, table, partition, index) by its
//! kind, the id of its parent and its own id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};
use crate::protocol as pb;

/// Kind of entity a [`CommonId`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Schema,
    Table,
    Part,
    Index,
}

impl EntityType {
    /// Wire name, as used in [`CommonId`]'s text form
    pub fn as_str(&self) -> &'static str {
        self.to_proto().as_str_name()
    }

    pub(crate) fn to_proto(self) -> pb::EntityType {
        match self {
            EntityType::Schema => pb::EntityType::Schema,
            EntityType::Table => pb::EntityType::Table,
            EntityType::Part => pb::EntityType::Part,
            EntityType::Index => pb::EntityType::Index,
        }
    }

    pub(crate) fn from_proto(value: pb::EntityType) -> Self {
        match value {
            pb::EntityType::Schema => EntityType::Schema,
            pb::EntityType::Table => EntityType::Table,
            pb::EntityType::Part => EntityType::Part,
            pb::EntityType::Index => EntityType::Index,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable `(type, parent_id, entity_id)` triple
///
/// Equality and hashing cover all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommonId {
    entity_type: EntityType,
    parent_id: i64,
    entity_id: i64,
}

impl CommonId {
    pub const fn new(entity_type: EntityType, parent_id: i64, entity_id: i64) -> Self {
        Self {
            entity_type,
            parent_id,
            entity_id,
        }
    }

    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub const fn parent_id(&self) -> i64 {
        self.parent_id
    }

    pub const fn entity_id(&self) -> i64 {
        self.entity_id
    }
}

impl fmt::Display for CommonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommonId[{}-{}-{}]",
            self.entity_type, self.parent_id, self.entity_id
        )
    }
}

impl FromStr for CommonId {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SdkError::InvalidCommonId { input: s.to_string() };

        let body = s
            .strip_prefix("CommonId[")
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(invalid)?;

        // Ids may be negative: a doubled '-' is separator plus sign.
        let (head, entity) = split_id(body).ok_or_else(invalid)?;
        let (kind, parent) = split_id(head).ok_or_else(invalid)?;

        let entity_type = pb::EntityType::from_str_name(kind)
            .map(EntityType::from_proto)
            .ok_or_else(invalid)?;
        let parent_id = parent.parse().map_err(|_| invalid())?;
        let entity_id = entity.parse().map_err(|_| invalid())?;

        Ok(Self::new(entity_type, parent_id, entity_id))
    }
}

/// Split `"<head>-<number>"` where the number may itself start with '-'
fn split_id(s: &str) -> Option<(&str, &str)> {
    let idx = s.rfind('-')?;
    let (head, tail) = (&s[..idx], &s[idx + 1..]);
    if head.ends_with('-') {
        Some((&head[..head.len() - 1], &s[idx..]))
    } else {
        Some((head, tail))
    }
}

impl From<CommonId> for pb::DingoCommonId {
    fn from(id: CommonId) -> Self {
        pb::DingoCommonId {
            entity_type: id.entity_type.to_proto() as i32,
            parent_entity_id: id.parent_id,
            entity_id: id.entity_id,
        }
    }
}

impl TryFrom<pb::DingoCommonId> for CommonId {
    type Error = SdkError;

    fn try_from(id: pb::DingoCommonId) -> Result<Self> {
        let entity_type = pb::EntityType::try_from(id.entity_type).map_err(|_| {
            SdkError::InvalidMessage {
                reason: format!("unknown entity type {}", id.entity_type),
            }
        })?;
        Ok(Self::new(
            EntityType::from_proto(entity_type),
            id.parent_entity_id,
            id.entity_id,
        ))
    }
}
