//! Mapping directory entries to the canonical profile shape.

use sp_model::{AttributeMap, DirectoryUser};

use crate::search::DirectoryEntry;

/// Maps a directory entry to a [`DirectoryUser`] using the configured
/// attribute names.
///
/// Multi-valued attributes contribute their first value; missing
/// attributes map to `None`. The stable identifier falls back to the
/// entry's DN when no identifier attribute resolves.
#[must_use]
pub fn map_entry(entry: &DirectoryEntry, attrs: &AttributeMap) -> DirectoryUser {
    let username = entry
        .get_attr(&attrs.username)
        .unwrap_or(entry.dn.as_str())
        .to_string();

    let id = entry
        .object_id(&attrs.user_id)
        .unwrap_or_else(|| entry.dn.clone());

    DirectoryUser {
        id,
        username,
        display_name: entry.get_attr(&attrs.display_name).map(String::from),
        email: entry.get_attr(&attrs.email).map(String::from),
        dn: entry.dn.clone(),
        groups: entry.groups(),
        raw: entry.to_raw_json(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn entry(attrs: &[(&str, &[&str])]) -> DirectoryEntry {
        DirectoryEntry {
            dn: "cn=jdoe,ou=users,dc=example,dc=com".to_string(),
            attributes: attrs
                .iter()
                .map(|(k, vs)| {
                    (
                        (*k).to_string(),
                        vs.iter().map(|v| (*v).to_string()).collect(),
                    )
                })
                .collect(),
            binary_attributes: HashMap::new(),
        }
    }

    #[test]
    fn maps_default_attributes() {
        let entry = entry(&[
            ("sAMAccountName", &["jdoe"]),
            ("displayName", &["John Doe"]),
            ("mail", &["jdoe@example.com"]),
            ("objectGUID", &["guid-123"]),
            ("memberOf", &["CN=IT,OU=Groups,DC=x,DC=com"]),
        ]);

        let user = map_entry(&entry, &AttributeMap::default());

        assert_eq!(user.username, "jdoe");
        assert_eq!(user.display_name.as_deref(), Some("John Doe"));
        assert_eq!(user.email.as_deref(), Some("jdoe@example.com"));
        assert_eq!(user.id, "guid-123");
        assert_eq!(user.groups, vec!["CN=IT,OU=Groups,DC=x,DC=com"]);
    }

    #[test]
    fn missing_attributes_map_to_none() {
        let entry = entry(&[("sAMAccountName", &["jdoe"])]);
        let user = map_entry(&entry, &AttributeMap::default());

        assert!(user.display_name.is_none());
        assert!(user.email.is_none());
        assert!(user.groups.is_empty());
    }

    #[test]
    fn id_falls_back_to_dn() {
        let entry = entry(&[("sAMAccountName", &["jdoe"])]);
        let user = map_entry(&entry, &AttributeMap::default());

        assert_eq!(user.id, "cn=jdoe,ou=users,dc=example,dc=com");
    }

    #[test]
    fn multi_valued_attributes_take_first() {
        let entry = entry(&[
            ("sAMAccountName", &["jdoe"]),
            ("mail", &["first@example.com", "second@example.com"]),
        ]);
        let user = map_entry(&entry, &AttributeMap::default());

        assert_eq!(user.email.as_deref(), Some("first@example.com"));
    }
}
