//! Lowercased role name → role handle.

use crate::core::config::{scalar_to_string, value_kind};
use crate::core::error::ConfigError;
use crate::features::roles::directory::{RoleDirectory, RoleIdentifier};
use log::{debug, error, warn};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Config key holding the role table, after normalization
pub const ROLES_KEY: &str = "ROLES";

/// The same key as written in `config.yml`, used in errors
const ROLES_FILE_KEY: &str = "roles";

/// One entry of the `roles` section, name already lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequest {
    pub name: String,
    pub identifier: RoleIdentifier,
}

impl RoleRequest {
    /// Read the normalized `ROLES` value. `None` means no roles.
    ///
    /// Entries with an unusable identifier are skipped with a warning.
    /// Names that collide after lowercasing keep the first entry.
    pub fn from_config(value: Option<&Value>, log_target: &str) -> Result<Vec<Self>, ConfigError> {
        let mapping = match value {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Mapping(mapping)) => mapping,
            Some(other) => {
                error!(target: log_target, "Invalid roles section: found {}", value_kind(other));
                return Err(ConfigError::InvalidValue {
                    key: ROLES_FILE_KEY.to_string(),
                    expected: "a mapping of role names to role ids or names",
                });
            }
        };

        let mut requests: Vec<RoleRequest> = Vec::with_capacity(mapping.len());
        for (name, identifier) in mapping {
            let Some(name) = scalar_to_string(name) else {
                warn!(target: log_target, "Skipping role with {} as its name", value_kind(name));
                continue;
            };
            let Some(identifier) = RoleIdentifier::from_value(identifier) else {
                warn!(target: log_target, "Skipping role '{name}': {} is not a role id or name", value_kind(identifier));
                continue;
            };

            let name = name.to_lowercase();
            if requests.iter().any(|r| r.name == name) {
                warn!(target: log_target, "Skipping duplicate role '{name}'");
                continue;
            }
            requests.push(RoleRequest { name, identifier });
        }
        Ok(requests)
    }
}

/// Roles that were found in the guild. Missing roles are simply absent.
#[derive(Debug, Clone)]
pub struct RoleRegistry<R> {
    roles: BTreeMap<String, R>,
}

impl<R> Default for RoleRegistry<R> {
    fn default() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }
}

impl<R> RoleRegistry<R> {
    /// Look every request up in `directory`, keeping the ones that exist.
    pub fn resolve<D>(directory: &D, requests: &[RoleRequest], log_target: &str) -> Self
    where
        D: RoleDirectory<Role = R>,
    {
        let roles = requests
            .iter()
            .filter_map(|request| {
                let role = directory.find_role(&request.identifier)?;
                debug!(target: log_target, "Resolved role '{}'", request.name);
                Some((request.name.clone(), role))
            })
            .collect();
        Self { roles }
    }

    /// Look up by lowercased name.
    pub fn get(&self, name: &str) -> Option<&R> {
        self.roles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
