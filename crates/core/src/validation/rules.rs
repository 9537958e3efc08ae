//! Cross-field business rules and shared content screening.
//!
//! Rules run only after every field coerced successfully. Each rule declares
//! the fields it reads so update-mode validation can skip rules whose inputs
//! the payload does not touch.

use std::fmt;

use super::errors::ValidationError;
use super::value::TypedRecord;
use crate::config::ValidationConfig;
use crate::types::Timestamp;

/// Everything a rule may consult besides the record itself.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub config: &'a ValidationConfig,
    /// Wall-clock instant of this validation call.
    pub now: Timestamp,
}

type RuleFn = dyn Fn(&TypedRecord, &RuleContext<'_>) -> Vec<ValidationError> + Send + Sync;

/// A named cross-field invariant with an explicit field dependency set.
pub struct BusinessRule {
    pub name: &'static str,
    pub depends_on: &'static [&'static str],
    check: Box<RuleFn>,
}

impl BusinessRule {
    pub fn new<F>(name: &'static str, depends_on: &'static [&'static str], check: F) -> Self
    where
        F: Fn(&TypedRecord, &RuleContext<'_>) -> Vec<ValidationError> + Send + Sync + 'static,
    {
        Self {
            name,
            depends_on,
            check: Box::new(check),
        }
    }

    /// Whether any declared dependency appears among `fields`.
    pub fn triggered_by<'f>(&self, mut fields: impl Iterator<Item = &'f str>) -> bool {
        fields.any(|f| self.depends_on.contains(&f))
    }

    pub fn check(&self, record: &TypedRecord, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        (self.check)(record, ctx)
    }
}

impl fmt::Debug for BusinessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessRule")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// Run every rule, collecting all failures. No rule short-circuits another.
pub fn run_rules<'r>(
    rules: impl IntoIterator<Item = &'r BusinessRule>,
    record: &TypedRecord,
    ctx: &RuleContext<'_>,
) -> Vec<ValidationError> {
    rules
        .into_iter()
        .flat_map(|rule| rule.check(record, ctx))
        .collect()
}

// ---------------------------------------------------------------------------
// Screening helpers
// ---------------------------------------------------------------------------

/// First configured term found anywhere in `text`, ignoring case.
pub fn find_banned_term<'a>(text: &str, terms: &'a [String]) -> Option<&'a str> {
    let haystack = text.to_lowercase();
    terms
        .iter()
        .map(String::as_str)
        .filter(|term| !term.is_empty())
        .find(|term| haystack.contains(&term.to_lowercase()))
}

/// First reserved word appearing as a whole word in `text`, ignoring case.
pub fn find_reserved_word<'a>(text: &str, words: &'a [String]) -> Option<&'a str> {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();
    words
        .iter()
        .map(String::as_str)
        .find(|word| tokens.iter().any(|t| *t == word.to_lowercase()))
}

/// Length of the longest run of one repeated character.
pub fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for c in text.chars() {
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}

/// Share of upper-case letters among all alphabetic characters.
pub fn uppercase_ratio(text: &str) -> f64 {
    let (letters, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(letters, upper), c| {
            (letters + 1, upper + usize::from(c.is_uppercase()))
        });
    if letters == 0 {
        0.0
    } else {
        upper as f64 / letters as f64
    }
}

/// Screen one text field against banned terms and, optionally, reserved words.
pub fn screen_text(
    field: &str,
    text: &str,
    config: &ValidationConfig,
    check_reserved: bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(term) = find_banned_term(text, &config.banned_terms) {
        errors.push(ValidationError::rule(
            field,
            format!("{field} contains disallowed content: \"{term}\""),
        ));
    }
    if check_reserved {
        if let Some(word) = find_reserved_word(text, &config.reserved_words) {
            errors.push(ValidationError::rule(
                field,
                format!("{field} must not use the reserved word \"{word}\""),
            ));
        }
    }
    errors
}
