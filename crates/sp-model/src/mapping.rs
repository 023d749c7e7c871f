//! Directory group to role mappings and the matching rules that drive
//! role resolution.
//!
//! Matching is deliberately permissive so that DN formatting differences
//! across directory servers (case, whitespace, partial DNs) do not break
//! role assignment. A mapping matches a group when any of three tests
//! succeeds: case-insensitive equality, substring containment in either
//! direction, or equality of the `CN=` components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// Reserved configuration id whose mappings apply to every configuration.
pub const WILDCARD_CONFIG_ID: Uuid = Uuid::nil();

/// Kind of directory object a mapping refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingType {
    /// A directory group.
    #[default]
    Group,
    /// An organizational unit.
    Ou,
}

impl MappingType {
    /// Returns the database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Ou => "ou",
        }
    }

    /// Parses the database representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "group" => Some(Self::Group),
            "ou" => Some(Self::Ou),
            _ => None,
        }
    }
}

/// An admin-managed mapping from a directory group to a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryRoleMapping {
    /// Unique identifier.
    pub id: Uuid,
    /// Configuration the mapping is scoped to ([`WILDCARD_CONFIG_ID`]
    /// for all configurations).
    pub directory_config_id: Uuid,
    /// Role granted by the mapping.
    pub role_id: Uuid,
    /// Full DN of the directory group.
    pub group_dn: String,
    /// Short group name (usually the `CN=` component).
    pub group_name: String,
    /// Kind of directory object.
    pub mapping_type: MappingType,
    /// When the mapping was created.
    pub created_at: DateTime<Utc>,
    /// When the mapping was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DirectoryRoleMapping {
    /// Creates a new group mapping, deriving the short name from the DN.
    #[must_use]
    pub fn new(directory_config_id: Uuid, role_id: Uuid, group_dn: impl Into<String>) -> Self {
        let group_dn = group_dn.into();
        let group_name = extract_cn(&group_dn).unwrap_or_else(|| group_dn.clone());
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            directory_config_id,
            role_id,
            group_dn,
            group_name,
            mapping_type: MappingType::Group,
            created_at: now,
            updated_at: now,
        }
    }

    /// Tests whether any of the given group DNs matches this mapping.
    #[must_use]
    pub fn matches_any(&self, groups: &[String]) -> bool {
        groups.iter().any(|g| groups_match(g, &self.group_dn))
    }
}

/// Extracts the `CN=` component of a DN, preserving its original case.
#[must_use]
pub fn extract_cn(dn: &str) -> Option<String> {
    for part in dn.split(',') {
        let part = part.trim();
        if let Some(prefix) = part.get(..3) {
            if prefix.eq_ignore_ascii_case("cn=") {
                return Some(part[3..].to_string());
            }
        }
    }
    None
}

/// Tests whether two group identifiers refer to the same group.
///
/// Three tests, any of which suffices:
/// 1. case-insensitive equality,
/// 2. case-insensitive substring containment in either direction,
/// 3. case-insensitive equality of the `CN=` components.
#[must_use]
pub fn groups_match(a: &str, b: &str) -> bool {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    if a_lower == b_lower {
        return true;
    }

    if a_lower.contains(&b_lower) || b_lower.contains(&a_lower) {
        return true;
    }

    match (extract_cn(&a_lower), extract_cn(&b_lower)) {
        (Some(cn_a), Some(cn_b)) => cn_a == cn_b,
        _ => false,
    }
}

/// Resolves roles for a set of group DNs against loaded mapping rows.
///
/// Returns the roles referenced by matching mappings, de-duplicated by
/// role id with the first occurrence winning. An empty group list
/// resolves to an empty role set.
#[must_use]
pub fn resolve_roles(mappings: &[(DirectoryRoleMapping, Role)], groups: &[String]) -> Vec<Role> {
    if groups.is_empty() {
        return Vec::new();
    }

    let mut roles: Vec<Role> = Vec::new();
    for (mapping, role) in mappings {
        if mapping.matches_any(groups) && !roles.iter().any(|r| r.id == role.id) {
            roles.push(role.clone());
        }
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_for(dn: &str, role: &Role) -> (DirectoryRoleMapping, Role) {
        (
            DirectoryRoleMapping::new(Uuid::now_v7(), role.id, dn),
            role.clone(),
        )
    }

    #[test]
    fn extract_cn_parses_first_component() {
        assert_eq!(
            extract_cn("CN=IT Staff,OU=Groups,DC=example,DC=com").as_deref(),
            Some("IT Staff")
        );
        assert_eq!(
            extract_cn("cn=admins,dc=example,dc=com").as_deref(),
            Some("admins")
        );
        assert_eq!(extract_cn("ou=Groups,dc=example,dc=com"), None);
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        assert!(groups_match(
            "CN=IT,OU=Groups,DC=x,DC=com",
            "cn=it,ou=groups,dc=x,dc=com"
        ));
    }

    #[test]
    fn substring_containment_matches_both_directions() {
        assert!(groups_match("cn=it,ou=groups,dc=x,dc=com", "cn=it"));
        assert!(groups_match("cn=it", "cn=it,ou=groups,dc=x,dc=com"));
    }

    #[test]
    fn cn_component_equality_matches() {
        // Different suffixes, same CN.
        assert!(groups_match(
            "CN=Admins,OU=Groups,DC=old,DC=com",
            "cn=admins,ou=security,dc=new,dc=net"
        ));
    }

    #[test]
    fn unrelated_groups_do_not_match() {
        assert!(!groups_match(
            "cn=admins,dc=example,dc=com",
            "cn=users,dc=example,dc=com"
        ));
    }

    #[test]
    fn empty_groups_resolve_to_nothing() {
        let role = Role::new("admin");
        let mappings = vec![mapping_for("cn=admins,dc=x,dc=com", &role)];

        assert!(resolve_roles(&mappings, &[]).is_empty());
    }

    #[test]
    fn resolution_deduplicates_by_role_id() {
        let role = Role::new("admin");
        // Two mappings to the same role, both matching.
        let mappings = vec![
            mapping_for("cn=admins,dc=x,dc=com", &role),
            mapping_for("cn=ADMINS,ou=legacy,dc=x,dc=com", &role),
        ];
        let groups = vec!["CN=Admins,DC=x,DC=com".to_string()];

        let resolved = resolve_roles(&mappings, &groups);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, role.id);
    }

    #[test]
    fn case_insensitive_exact_match_resolves_role() {
        let role = Role::new("R1");
        let mappings = vec![mapping_for("cn=it,ou=groups,dc=x,dc=com", &role)];
        let groups = vec!["CN=IT,OU=Groups,DC=x,DC=com".to_string()];

        let resolved = resolve_roles(&mappings, &groups);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "R1");
    }

    #[test]
    fn new_mapping_derives_group_name() {
        let mapping = DirectoryRoleMapping::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            "CN=IT Staff,OU=Groups,DC=example,DC=com",
        );
        assert_eq!(mapping.group_name, "IT Staff");
        assert_eq!(mapping.mapping_type, MappingType::Group);
    }
}
