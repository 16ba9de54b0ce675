use std::sync::LazyLock;

use regex::Regex;

/// Extracts structured information from PostgreSQL constraint violations.
///
/// Index and constraint names in this schema follow the
/// `<table>_<column>[_live]_<idx|key|fkey|check>` convention, which is what
/// `parse_constraint_name` relies on.
pub struct ConstraintParser;

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern is valid")
});

static COLUMN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"column "([^"]+)""#).expect("column pattern is valid"));

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:table|relation) "([^"]+)""#).expect("table pattern is valid")
});

const CONSTRAINT_SUFFIXES: [&str; 5] = ["_fkey", "_key", "_idx", "_check", "_pkey"];

impl ConstraintParser {
    /// Returns `(entity, field, value)` for a unique violation.
    ///
    /// `text` is the server message followed by its DETAIL line, since
    /// PostgreSQL reports the offending key only in the detail.
    pub fn parse_unique_violation(
        text: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value(text);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::extract_table(text).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Returns `(entity, field, referenced_value)` for a foreign key violation.
    pub fn parse_foreign_key_violation(
        text: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value(text);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "invalid_reference".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::extract_table(text).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Returns `(entity, field)` for a not-null violation.
    pub fn parse_not_null_violation(text: &str) -> Option<(String, String)> {
        let field = Self::extract_column(text)?;
        let entity = Self::extract_table(text).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Returns `(entity, field)` for a check violation.
    pub fn parse_check_violation(
        text: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        constraint_name
            .and_then(Self::parse_constraint_name)
            .or_else(|| Self::parse_not_null_violation(text))
    }

    /// Splits a constraint name into `(table, column)`.
    ///
    /// - `users_email_live_idx` -> `("users", "email")`
    /// - `posts_author_id_fkey` -> `("posts", "author_id")`
    /// - `posts_title_check` -> `("posts", "title")`
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;
        let stem = stem.strip_suffix("_live").unwrap_or(stem);

        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    pub fn extract_key_value(text: &str) -> Option<(String, String)> {
        let caps = KEY_VALUE.captures(text)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    pub fn extract_column(text: &str) -> Option<String> {
        COLUMN_NAME
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_table(text: &str) -> Option<String> {
        TABLE_NAME
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_name_variants() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_live_idx"),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("posts_author_id_fkey"),
            Some(("posts".to_string(), "author_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_username_key"),
            Some(("users".to_string(), "username".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("weird"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("users_idx"), None);
    }

    #[test]
    fn test_unique_violation_from_detail() {
        let text = "duplicate key value violates unique constraint \"users_email_live_idx\"\nKey (email)=(a@example.com) already exists.";
        let parsed =
            ConstraintParser::parse_unique_violation(text, Some("users_email_live_idx"));
        assert_eq!(
            parsed,
            Some((
                "users".to_string(),
                "email".to_string(),
                "a@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_unique_violation_without_constraint_name() {
        let text = "duplicate key value violates unique constraint on table \"users\"\nKey (username)=(alice) already exists.";
        let parsed = ConstraintParser::parse_unique_violation(text, None);
        assert_eq!(
            parsed,
            Some(("users".to_string(), "username".to_string(), "alice".to_string()))
        );
    }

    #[test]
    fn test_not_null_violation() {
        let text = "null value in column \"title\" of relation \"posts\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::parse_not_null_violation(text),
            Some(("posts".to_string(), "title".to_string()))
        );
    }

    #[test]
    fn test_no_information_yields_none() {
        assert_eq!(ConstraintParser::parse_unique_violation("boom", None), None);
        assert_eq!(ConstraintParser::parse_not_null_violation("boom"), None);
    }
}
