//! Validation engine configuration.
//!
//! Holds the screening word lists, thresholds, and leniency policies that
//! the business rules and record mappers consult. Loaded once at startup and
//! shared read-only.

use std::str::FromStr;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What to do with collection elements that are blank after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyItemPolicy {
    /// Silently discard the element.
    #[default]
    Drop,
    /// Report the element as an item error.
    Reject,
}

impl FromStr for EmptyItemPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "reject" => Ok(Self::Reject),
            other => Err(CoreError::Configuration(format!(
                "unknown empty item policy '{other}', expected 'drop' or 'reject'"
            ))),
        }
    }
}

/// What to do with input keys that no field in the schema declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeyPolicy {
    /// Silently ignore the key.
    #[default]
    Ignore,
    /// Report the key as a field error.
    Reject,
}

impl FromStr for UnknownKeyPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(CoreError::Configuration(format!(
                "unknown key policy '{other}', expected 'ignore' or 'reject'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Tunables for content screening and input leniency.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Substrings rejected anywhere in screened text (case-insensitive).
    pub banned_terms: Vec<String>,
    /// Whole words rejected in club names and descriptions (case-insensitive).
    pub reserved_words: Vec<String>,
    /// Suffix an official club contact address must end with.
    pub official_email_suffix: String,
    /// A run of this many identical characters in a comment is rejected.
    pub max_char_run: usize,
    /// Maximum share of upper-case letters among all letters in a comment.
    pub max_uppercase_ratio: f64,
    /// Comments shorter than this are exempt from the upper-case check.
    pub uppercase_min_length: usize,
    pub empty_items: EmptyItemPolicy,
    pub unknown_keys: UnknownKeyPolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            banned_terms: ["spam", "scam", "viagra", "casino"]
                .into_iter()
                .map(String::from)
                .collect(),
            reserved_words: [
                "admin",
                "administrator",
                "moderator",
                "official",
                "staff",
                "system",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            official_email_suffix: ".edu".to_string(),
            max_char_run: 10,
            max_uppercase_ratio: 0.7,
            uppercase_min_length: 20,
            empty_items: EmptyItemPolicy::Drop,
            unknown_keys: UnknownKeyPolicy::Ignore,
        }
    }
}

impl ValidationConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                          |
    /// |-----------------------------------|----------------------------------|
    /// | `CLUBHOUSE_BANNED_TERMS`          | `spam,scam,viagra,casino`        |
    /// | `CLUBHOUSE_RESERVED_WORDS`        | `admin,administrator,...,system` |
    /// | `CLUBHOUSE_OFFICIAL_EMAIL_SUFFIX` | `.edu`                           |
    /// | `CLUBHOUSE_MAX_CHAR_RUN`          | `10`                             |
    /// | `CLUBHOUSE_MAX_UPPERCASE_RATIO`   | `0.7`                            |
    /// | `CLUBHOUSE_UPPERCASE_MIN_LENGTH`  | `20`                             |
    /// | `CLUBHOUSE_EMPTY_ITEMS`           | `drop`                           |
    /// | `CLUBHOUSE_UNKNOWN_KEYS`          | `ignore`                         |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("CLUBHOUSE_BANNED_TERMS") {
            config.banned_terms = split_list(&raw);
        }
        if let Some(raw) = lookup("CLUBHOUSE_RESERVED_WORDS") {
            config.reserved_words = split_list(&raw);
        }
        if let Some(raw) = lookup("CLUBHOUSE_OFFICIAL_EMAIL_SUFFIX") {
            config.official_email_suffix = raw.trim().to_string();
        }
        if let Some(raw) = lookup("CLUBHOUSE_MAX_CHAR_RUN") {
            config.max_char_run = parse_var("CLUBHOUSE_MAX_CHAR_RUN", &raw)?;
        }
        if let Some(raw) = lookup("CLUBHOUSE_MAX_UPPERCASE_RATIO") {
            config.max_uppercase_ratio = parse_var("CLUBHOUSE_MAX_UPPERCASE_RATIO", &raw)?;
        }
        if let Some(raw) = lookup("CLUBHOUSE_UPPERCASE_MIN_LENGTH") {
            config.uppercase_min_length = parse_var("CLUBHOUSE_UPPERCASE_MIN_LENGTH", &raw)?;
        }
        if let Some(raw) = lookup("CLUBHOUSE_EMPTY_ITEMS") {
            config.empty_items = raw.parse()?;
        }
        if let Some(raw) = lookup("CLUBHOUSE_UNKNOWN_KEYS") {
            config.unknown_keys = raw.parse()?;
        }

        config.check()?;
        Ok(config)
    }

    /// Reject combinations no rule could evaluate sensibly.
    pub fn check(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.max_uppercase_ratio) {
            return Err(CoreError::Configuration(format!(
                "max_uppercase_ratio must be between 0.0 and 1.0, got {}",
                self.max_uppercase_ratio
            )));
        }
        if self.max_char_run < 2 {
            return Err(CoreError::Configuration(format!(
                "max_char_run must be at least 2, got {}",
                self.max_char_run
            )));
        }
        Ok(())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T, CoreError> {
    raw.trim().parse().map_err(|_| {
        tracing::warn!(key, value = raw, "Unparsable configuration override");
        CoreError::Configuration(format!("{key} has invalid value '{raw}'"))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = ValidationConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ValidationConfig::default());
        assert_eq!(config.empty_items, EmptyItemPolicy::Drop);
        assert_eq!(config.unknown_keys, UnknownKeyPolicy::Ignore);
    }

    #[test]
    fn overrides_lists_and_policies() {
        let config = ValidationConfig::from_lookup(lookup_from(&[
            ("CLUBHOUSE_BANNED_TERMS", " foo , ,bar "),
            ("CLUBHOUSE_OFFICIAL_EMAIL_SUFFIX", "@campus.example.org"),
            ("CLUBHOUSE_EMPTY_ITEMS", "Reject"),
            ("CLUBHOUSE_UNKNOWN_KEYS", "reject"),
            ("CLUBHOUSE_MAX_CHAR_RUN", "6"),
        ]))
        .unwrap();
        assert_eq!(config.banned_terms, vec!["foo", "bar"]);
        assert_eq!(config.official_email_suffix, "@campus.example.org");
        assert_eq!(config.empty_items, EmptyItemPolicy::Reject);
        assert_eq!(config.unknown_keys, UnknownKeyPolicy::Reject);
        assert_eq!(config.max_char_run, 6);
    }

    #[test]
    fn bad_number_is_configuration_error() {
        let result =
            ValidationConfig::from_lookup(lookup_from(&[("CLUBHOUSE_MAX_CHAR_RUN", "lots")]));
        assert_matches!(result, Err(CoreError::Configuration(_)));
    }

    #[test]
    fn bad_policy_is_configuration_error() {
        let result =
            ValidationConfig::from_lookup(lookup_from(&[("CLUBHOUSE_EMPTY_ITEMS", "maybe")]));
        assert_matches!(result, Err(CoreError::Configuration(_)));
    }

    #[test]
    fn ratio_out_of_range_rejected() {
        let result = ValidationConfig::from_lookup(lookup_from(&[(
            "CLUBHOUSE_MAX_UPPERCASE_RATIO",
            "1.5",
        )]));
        assert_matches!(result, Err(CoreError::Configuration(_)));
    }
}
