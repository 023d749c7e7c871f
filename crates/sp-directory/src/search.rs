//! Directory entry representation and filter helpers.

use std::collections::HashMap;

use ldap3::SearchEntry;
use serde_json::{Map, Value};

/// A directory entry with parsed attributes.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Distinguished Name.
    pub dn: String,

    /// Attributes (all values are multi-valued).
    pub attributes: HashMap<String, Vec<String>>,

    /// Binary attributes.
    pub binary_attributes: HashMap<String, Vec<Vec<u8>>>,
}

impl DirectoryEntry {
    /// Creates a new entry from a search result.
    #[must_use]
    pub fn from_search_entry(entry: SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
            binary_attributes: entry.bin_attrs,
        }
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Gets all values of an attribute.
    #[must_use]
    pub fn get_attrs(&self, name: &str) -> Option<&Vec<String>> {
        self.attributes.get(name)
    }

    /// Gets the first value of a binary attribute.
    #[must_use]
    pub fn get_binary_attr(&self, name: &str) -> Option<&Vec<u8>> {
        self.binary_attributes.get(name).and_then(|v| v.first())
    }

    /// Gets the group DNs from the `memberOf` attribute.
    #[must_use]
    pub fn groups(&self) -> Vec<String> {
        self.get_attrs("memberOf").cloned().unwrap_or_default()
    }

    /// Gets the stable object identifier, decoding a binary value
    /// (Active Directory `objectGUID`) when the text form is absent.
    #[must_use]
    pub fn object_id(&self, id_attr: &str) -> Option<String> {
        if let Some(val) = self.get_attr(id_attr) {
            return Some(val.to_string());
        }

        if let Some(bytes) = self.get_binary_attr(id_attr) {
            return Some(format_guid(bytes));
        }

        None
    }

    /// Serializes the textual attributes to a JSON object.
    #[must_use]
    pub fn to_raw_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("dn".to_string(), Value::String(self.dn.clone()));
        for (name, values) in &self.attributes {
            let json_values = values
                .iter()
                .map(|v| Value::String(v.clone()))
                .collect::<Vec<_>>();
            map.insert(name.clone(), Value::Array(json_values));
        }
        Value::Object(map)
    }
}

/// Formats a binary GUID (Active Directory format) as a string.
fn format_guid(bytes: &[u8]) -> String {
    if bytes.len() != 16 {
        return hex::encode(bytes);
    }

    // Active Directory GUID format (mixed endianness)
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[3], bytes[2], bytes[1], bytes[0],
        bytes[5], bytes[4],
        bytes[7], bytes[6],
        bytes[8], bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

/// Builds the user search filter by substituting the `{{username}}`
/// placeholder with the escaped login name.
#[must_use]
pub fn build_user_filter(template: &str, username: &str) -> String {
    let escaped = ldap_escape(username);
    template.replace("{{username}}", &escaped)
}

/// Escapes special characters in LDAP filter values.
fn ldap_escape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(attrs: &[(&str, &[&str])]) -> DirectoryEntry {
        let attributes = attrs
            .iter()
            .map(|(k, vs)| {
                (
                    (*k).to_string(),
                    vs.iter().map(|v| (*v).to_string()).collect(),
                )
            })
            .collect();
        DirectoryEntry {
            dn: "cn=jdoe,ou=users,dc=example,dc=com".to_string(),
            attributes,
            binary_attributes: HashMap::new(),
        }
    }

    #[test]
    fn get_attr_returns_first_value() {
        let entry = entry_with(&[("mail", &["a@example.com", "b@example.com"])]);
        assert_eq!(entry.get_attr("mail"), Some("a@example.com"));
        assert_eq!(entry.get_attr("missing"), None);
    }

    #[test]
    fn groups_from_member_of() {
        let entry = entry_with(&[(
            "memberOf",
            &["CN=IT,OU=Groups,DC=x,DC=com", "CN=VPN,OU=Groups,DC=x,DC=com"],
        )]);
        assert_eq!(entry.groups().len(), 2);
    }

    #[test]
    fn format_guid_works() {
        let guid_bytes: Vec<u8> = vec![
            0x01, 0x02, 0x03, 0x04, // Data1 (little-endian)
            0x05, 0x06, // Data2 (little-endian)
            0x07, 0x08, // Data3 (little-endian)
            0x09, 0x0A, // Data4[0..2]
            0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, // Data4[2..8]
        ];

        assert_eq!(format_guid(&guid_bytes), "04030201-0605-0807-090a-0b0c0d0e0f10");
    }

    #[test]
    fn filter_substitution_escapes_input() {
        let filter = build_user_filter("(sAMAccountName={{username}})", "jd(oe)*");
        assert_eq!(filter, "(sAMAccountName=jd\\28oe\\29\\2a)");
    }

    #[test]
    fn raw_json_includes_dn() {
        let entry = entry_with(&[("cn", &["John Doe"])]);
        let raw = entry.to_raw_json();
        assert_eq!(raw["dn"], "cn=jdoe,ou=users,dc=example,dc=com");
        assert_eq!(raw["cn"][0], "John Doe");
    }
}
