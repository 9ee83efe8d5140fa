//! Role lookup against the chat platform.

use serde::Deserialize;
use serde_yaml::Value;
use serenity::model::guild::Role;
use serenity::model::id::RoleId;
use std::collections::HashMap;

/// How a role is referenced in `config.yml`: by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleIdentifier {
    Id(u64),
    Name(String),
}

impl RoleIdentifier {
    /// Read an identifier from a config value. Strings of digits are ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match serde_yaml::from_value(value.clone()).ok()? {
            RoleIdentifier::Name(name) => match name.trim().parse::<u64>() {
                Ok(id) => Some(RoleIdentifier::Id(id)),
                Err(_) => Some(RoleIdentifier::Name(name)),
            },
            id => Some(id),
        }
    }

    pub fn matches(&self, id: u64, name: &str) -> bool {
        match self {
            RoleIdentifier::Id(wanted) => *wanted == id,
            RoleIdentifier::Name(wanted) => wanted == name,
        }
    }
}

/// Source of role handles for one guild.
///
/// Implemented for serenity's guild role map; tests supply their own.
pub trait RoleDirectory {
    type Role;

    /// Find a role, or `None` when the guild has no such role.
    fn find_role(&self, identifier: &RoleIdentifier) -> Option<Self::Role>;
}

/// Roles of one guild as returned by `GuildId::roles`.
///
/// Duplicate names resolve to the lowest-positioned role.
impl RoleDirectory for HashMap<RoleId, Role> {
    type Role = Role;

    fn find_role(&self, identifier: &RoleIdentifier) -> Option<Role> {
        if let RoleIdentifier::Id(id) = identifier {
            return self.get(&RoleId(*id)).cloned();
        }
        self.values()
            .filter(|role| identifier.matches(role.id.0, &role.name))
            .min_by_key(|role| (role.position, role.id.0))
            .cloned()
    }
}
