//! NeuroBlueprint token grammar.
//!
//! A name is an ordered sequence of `key-value` tokens joined by
//! underscores, e.g. "sub-001_date-20240517". The first token's key is the
//! level prefix ("sub" or "ses"). Tags of the form `@NAME@` are placeholders
//! substituted during formatting.

use std::fmt;

use clap::ValueEnum;

use crate::error::NameFormattingError;
use crate::utils::Clock;

/// Inclusive range of numbers, e.g. "sub-001@TO@003"
pub(crate) const TO_TAG: &str = "@TO@";

/// Replaced with `date-YYYYMMDD` at formatting time
pub(crate) const DATE_TAG: &str = "@DATE@";

/// Replaced with `time-HHMMSS` at formatting time
pub(crate) const TIME_TAG: &str = "@TIME@";

/// Replaced with `datetime-YYYYMMDDTHHMMSS` at formatting time
pub(crate) const DATETIME_TAG: &str = "@DATETIME@";

/// Glob placeholder, only meaningful when selecting names for transfer
pub(crate) const WILDCARD_TAG: &str = "@*@";

pub(crate) const TOKEN_SEPARATOR: char = '_';
pub(crate) const KEY_VALUE_DELIMITER: char = '-';

/// Entity level a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Level {
    Sub,
    Ses,
}

impl Level {
    pub(crate) fn prefix(self) -> &'static str {
        match self {
            Level::Sub => "sub",
            Level::Ses => "ses",
        }
    }

    pub(crate) fn other(self) -> Level {
        match self {
            Level::Sub => Level::Ses,
            Level::Ses => Level::Sub,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Split a canonical name into ordered (key, value) tokens.
///
/// Each underscore-separated part must be exactly one `key-value` pair with
/// alphanumeric key and value. This is the grammar-level check; level rules
/// (prefix first, no duplicate keys) live in the validator.
pub(crate) fn split_into_tokens(name: &str) -> Result<Vec<(&str, &str)>, NameFormattingError> {
    let mut tokens = Vec::new();

    for part in name.split(TOKEN_SEPARATOR) {
        let pieces: Vec<&str> = part.split(KEY_VALUE_DELIMITER).collect();
        if pieces.len() != 2 {
            return Err(NameFormattingError::MalformedTokens {
                name: name.to_string(),
            });
        }

        let (key, value) = (pieces[0], pieces[1]);
        if key.is_empty() || value.is_empty() {
            return Err(NameFormattingError::EmptyTokenPart {
                name: name.to_string(),
            });
        }
        if !is_alphanumeric(key) || !is_alphanumeric(value) {
            return Err(NameFormattingError::DisallowedCharacters {
                name: name.to_string(),
            });
        }

        tokens.push((key, value));
    }

    Ok(tokens)
}

fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Replace `@DATE@`, `@TIME@` or `@DATETIME@` with the current date / time,
/// inserting underscores around the tag if the user left them out
/// (e.g. "sub-001@DATE@" becomes "sub-001_date-20240517").
pub(crate) fn substitute_dynamic_tags(
    name: &str,
    clock: &dyn Clock,
) -> Result<String, NameFormattingError> {
    let now = clock.now();
    let date = now.format("%Y%m%d").to_string();
    let time = now.format("%H%M%S").to_string();

    if name.contains(DATETIME_TAG) {
        replace_tag(name, DATETIME_TAG, &format!("datetime-{date}T{time}"))
    } else if name.contains(DATE_TAG) {
        replace_tag(name, DATE_TAG, &format!("date-{date}"))
    } else if name.contains(TIME_TAG) {
        replace_tag(name, TIME_TAG, &format!("time-{time}"))
    } else {
        Ok(name.to_string())
    }
}

fn replace_tag(
    name: &str,
    tag: &'static str,
    replacement: &str,
) -> Result<String, NameFormattingError> {
    if name.matches(tag).count() > 1 {
        return Err(NameFormattingError::RepeatedTag {
            tag,
            name: name.to_string(),
        });
    }
    Ok(pad_tag_with_separators(name, tag).replace(tag, replacement))
}

fn pad_tag_with_separators(name: &str, tag: &str) -> String {
    let Some(start) = name.find(tag) else {
        return name.to_string();
    };
    let end = start + tag.len();

    let mut padded = String::with_capacity(name.len() + 2);
    padded.push_str(&name[..start]);
    if start > 0 && !name[..start].ends_with(TOKEN_SEPARATOR) {
        padded.push(TOKEN_SEPARATOR);
    }
    padded.push_str(tag);
    if end < name.len() && !name[end..].starts_with(TOKEN_SEPARATOR) {
        padded.push(TOKEN_SEPARATOR);
    }
    padded.push_str(&name[end..]);
    padded
}

/// Extract the prefix-token value from a folder name, e.g. "001" from
/// "sub-001_id-a". Returns None for names that do not start with the
/// expected prefix, so callers can skip unrelated folders.
pub(crate) fn prefix_value(name: &str, level: Level) -> Option<&str> {
    let rest = name
        .strip_prefix(level.prefix())?
        .strip_prefix(KEY_VALUE_DELIMITER)?;
    let value = rest.split(TOKEN_SEPARATOR).next().unwrap_or("");
    (!value.is_empty()).then_some(value)
}

/// Whether two names refer to the same entity at the given level.
///
/// Values are compared numerically when both parse as integers, so
/// "sub-01" and "sub-001_id-a" count as the same subject despite the
/// differing zero-padding.
pub(crate) fn same_prefix_id(a: &str, b: &str, level: Level) -> bool {
    match (prefix_value(a, level), prefix_value(b, level)) {
        (Some(va), Some(vb)) => match (va.parse::<u64>(), vb.parse::<u64>()) {
            (Ok(na), Ok(nb)) => na == nb,
            _ => va == vb,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::fixed_clock;

    #[test]
    fn split_canonical_name() {
        let tokens = split_into_tokens("sub-001_id-a").unwrap();
        assert_eq!(tokens, vec![("sub", "001"), ("id", "a")]);
    }

    #[test]
    fn split_rejects_missing_value() {
        assert!(matches!(
            split_into_tokens("sub-"),
            Err(NameFormattingError::EmptyTokenPart { .. })
        ));
    }

    #[test]
    fn split_rejects_double_dash() {
        assert!(matches!(
            split_into_tokens("sub-001_my-tag-x"),
            Err(NameFormattingError::MalformedTokens { .. })
        ));
    }

    #[test]
    fn split_rejects_non_alphanumeric() {
        assert!(matches!(
            split_into_tokens("sub-0 1"),
            Err(NameFormattingError::DisallowedCharacters { .. })
        ));
    }

    #[test]
    fn substitute_date_tag() {
        let clock = fixed_clock();
        let result = substitute_dynamic_tags("sub-001_@DATE@", &clock).unwrap();
        assert_eq!(result, "sub-001_date-20240517");
    }

    #[test]
    fn substitute_time_tag() {
        let clock = fixed_clock();
        let result = substitute_dynamic_tags("sub-001_@TIME@", &clock).unwrap();
        assert_eq!(result, "sub-001_time-143005");
    }

    #[test]
    fn substitute_datetime_tag() {
        let clock = fixed_clock();
        let result = substitute_dynamic_tags("sub-003_@DATETIME@", &clock).unwrap();
        assert_eq!(result, "sub-003_datetime-20240517T143005");
    }

    #[test]
    fn substitute_pads_missing_separators() {
        let clock = fixed_clock();
        assert_eq!(
            substitute_dynamic_tags("sub-001@DATE@", &clock).unwrap(),
            "sub-001_date-20240517"
        );
        assert_eq!(
            substitute_dynamic_tags("sub-001@DATE@id-a", &clock).unwrap(),
            "sub-001_date-20240517_id-a"
        );
    }

    #[test]
    fn substitute_rejects_repeated_tag() {
        let clock = fixed_clock();
        assert!(matches!(
            substitute_dynamic_tags("sub-001_@DATE@_@DATE@", &clock),
            Err(NameFormattingError::RepeatedTag { tag: DATE_TAG, .. })
        ));
    }

    #[test]
    fn substitute_leaves_plain_names_untouched() {
        let clock = fixed_clock();
        assert_eq!(
            substitute_dynamic_tags("sub-001", &clock).unwrap(),
            "sub-001"
        );
    }

    #[test]
    fn prefix_value_extraction() {
        assert_eq!(prefix_value("sub-001", Level::Sub), Some("001"));
        assert_eq!(prefix_value("sub-001_id-a", Level::Sub), Some("001"));
        assert_eq!(prefix_value("ses-02", Level::Ses), Some("02"));
        assert_eq!(prefix_value("histology", Level::Sub), None);
        assert_eq!(prefix_value("ses-01", Level::Sub), None);
    }

    #[test]
    fn same_prefix_id_ignores_zero_padding() {
        assert!(same_prefix_id("sub-01", "sub-001_id-a", Level::Sub));
        assert!(!same_prefix_id("sub-01", "sub-002", Level::Sub));
        assert!(same_prefix_id("sub-abc", "sub-abc_id-x", Level::Sub));
        assert!(!same_prefix_id("sub-abc", "sub-abd", Level::Sub));
    }
}
