//! Project-specific utilities live here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,3}$").expect("email pattern is valid")
});

/// True when the value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Whether `value` is an address the services accept.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Partial-patch filter: absent and empty values mean "leave unchanged".
pub fn patch_value(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Reads an explicit JSON `null` as an empty string so form validation
/// reports the field as blank.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank(" root "));
    }

    #[test]
    fn email_pattern_matches_whole_value() {
        assert!(is_valid_email("root@bookstore.com"));
        assert!(is_valid_email("jane.doe+books@mail.example.io"));
        assert!(!is_valid_email("root@bookstore"));
        assert!(!is_valid_email("Root@Bookstore.com"));
        assert!(!is_valid_email("root@bookstore.info"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn null_reads_as_empty_string() {
        #[derive(Deserialize)]
        struct Form {
            #[serde(default, deserialize_with = "null_as_empty")]
            name: String,
        }

        let null: Form = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let missing: Form = serde_json::from_str("{}").unwrap();
        let present: Form = serde_json::from_str(r#"{"name": "dune"}"#).unwrap();

        assert_eq!(null.name, "");
        assert_eq!(missing.name, "");
        assert_eq!(present.name, "dune");
    }

    #[test]
    fn patch_value_drops_empty_strings() {
        assert_eq!(patch_value(None), None);
        assert_eq!(patch_value(Some(String::new())), None);
        assert_eq!(patch_value(Some("new".to_string())), Some("new".to_string()));
    }
}
