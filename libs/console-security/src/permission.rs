use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Coarse functional area used as the unit of permission granularity.
///
/// Known names match case-insensitively. Unknown names are kept verbatim
/// (trimmed) as [`Module::Other`] so a permission map round-trips without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Module {
    Property,
    Tenant,
    Lease,
    Revenue,
    Ar,
    Collections,
    Dashboard,
    Approvals,
    Documents,
    Other(String),
}

impl Module {
    pub const KNOWN: [Module; 9] = [
        Self::Property,
        Self::Tenant,
        Self::Lease,
        Self::Revenue,
        Self::Ar,
        Self::Collections,
        Self::Dashboard,
        Self::Approvals,
        Self::Documents,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Property => "PROPERTY",
            Self::Tenant => "TENANT",
            Self::Lease => "LEASE",
            Self::Revenue => "REVENUE",
            Self::Ar => "AR",
            Self::Collections => "COLLECTIONS",
            Self::Dashboard => "DASHBOARD",
            Self::Approvals => "APPROVALS",
            Self::Documents => "DOCUMENTS",
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        Self::KNOWN
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| Self::Other(name.to_owned()))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Module {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Module {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Capability that can be granted on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    View,
    Create,
    Edit,
    Delete,
    Approve,
}

/// Capability flags for one module. Flags missing on the wire are `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ModulePermission {
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_approve: bool,
}

impl ModulePermission {
    #[must_use]
    pub fn all() -> Self {
        Self {
            can_view: true,
            can_create: true,
            can_edit: true,
            can_delete: true,
            can_approve: true,
        }
    }

    #[must_use]
    pub fn view_only() -> Self {
        Self {
            can_view: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Create => self.can_create,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::Approve => self.can_approve,
        }
    }
}

/// Flat map of module name to capability flags for the active scope.
///
/// Owned by the server and treated as read-only by the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePermissions(BTreeMap<Module, ModulePermission>);

impl ModulePermissions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, module: Module, permission: ModulePermission) -> Self {
        self.0.insert(module, permission);
        self
    }

    #[must_use]
    pub fn get(&self, module: &Module) -> Option<&ModulePermission> {
        self.0.get(module)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Module, &ModulePermission)> {
        self.0.iter()
    }
}

impl FromIterator<(Module, ModulePermission)> for ModulePermissions {
    fn from_iter<T: IntoIterator<Item = (Module, ModulePermission)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn module_names_are_case_insensitive() {
        assert_eq!(Module::parse("lease"), Module::Lease);
        assert_eq!(Module::parse(" AR "), Module::Ar);
        assert_eq!(Module::parse("facilities"), Module::Other("facilities".to_owned()));
    }

    #[test]
    fn unknown_module_names_round_trip_verbatim() {
        let map: ModulePermissions =
            serde_json::from_value(json!({ "facilities": { "can_view": true } })).unwrap();
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({ "facilities": {
                "can_view": true, "can_create": false, "can_edit": false,
                "can_delete": false, "can_approve": false
            } })
        );
    }

    #[test]
    fn permission_map_parses_partial_flags() {
        let map: ModulePermissions = serde_json::from_value(json!({
            "LEASE": { "can_view": true, "can_edit": true },
            "AR": { "can_view": false },
            "FACILITIES": { "can_view": true }
        }))
        .unwrap();

        assert_eq!(map.len(), 3);
        let lease = map.get(&Module::Lease).unwrap();
        assert!(lease.allows(Capability::View));
        assert!(lease.allows(Capability::Edit));
        assert!(!lease.allows(Capability::Delete));
        assert!(!map.get(&Module::Ar).unwrap().can_view);
        assert!(map.get(&Module::Other("FACILITIES".to_owned())).is_some());
    }

    #[test]
    fn empty_object_is_empty_map() {
        let map: ModulePermissions = serde_json::from_value(json!({})).unwrap();
        assert!(map.is_empty());
    }
}
