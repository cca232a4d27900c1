//! Name formatting: raw user input to canonical names.
//!
//! Input may be a list of names, each possibly comma-joined, possibly
//! carrying dynamic tags or an `@TO@` range in the prefix value. Output is
//! an ordered, deduplicated list of fully-prefixed canonical names.

use crate::error::NameFormattingError;
use crate::names::tags::{
    self, KEY_VALUE_DELIMITER, Level, TO_TAG, TOKEN_SEPARATOR, WILDCARD_TAG,
};
use crate::utils::Clock;

/// Whether `@*@` may appear in formatted names. Only transfer selections
/// resolve wildcards against real folders; names used to create folders
/// must be literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WildcardPolicy {
    Allow,
    Reject,
}

/// Format raw subject or session input into canonical names.
///
/// Formatting an already-canonical name is idempotent. Exact duplicates are
/// dropped (first occurrence wins); two different inputs resolving to the
/// same id (e.g. "sub-001" and "sub-001_id-a") are an error.
pub(crate) fn format_names(
    raw: &[String],
    level: Level,
    clock: &dyn Clock,
    wildcards: WildcardPolicy,
) -> Result<Vec<String>, NameFormattingError> {
    let mut names = Vec::new();

    for piece in raw.iter().flat_map(|chunk| chunk.split(',')) {
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(NameFormattingError::EmptyName);
        }
        if piece.contains(' ') {
            return Err(NameFormattingError::ContainsSpaces { level });
        }
        if wildcards == WildcardPolicy::Reject && piece.contains(WILDCARD_TAG) {
            return Err(NameFormattingError::DisallowedCharacters {
                name: piece.to_string(),
            });
        }

        let substituted = tags::substitute_dynamic_tags(piece, clock)?;
        let prefixed = ensure_prefix(&substituted, level);

        if prefixed.contains(TO_TAG) {
            names.extend(expand_range(&prefixed, level)?);
        } else {
            names.push(prefixed);
        }
    }

    // Wildcard names are resolved later against real folders, so they
    // cannot be token-checked here.
    for name in &names {
        if !name.contains(WILDCARD_TAG) {
            tags::split_into_tokens(name)?;
        }
    }

    let deduped = dedup_preserving_order(names);
    check_no_conflicting_ids(&deduped, level)?;

    Ok(deduped)
}

fn ensure_prefix(name: &str, level: Level) -> String {
    let prefix = format!("{}{}", level.prefix(), KEY_VALUE_DELIMITER);
    if name.starts_with(&prefix) {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}

/// Expand `<prefix>-<n>@TO@<m>` into one name per number in the inclusive
/// range, carrying any trailing tokens over unchanged. Numbers are padded to
/// the max digit width of the two endpoints as given, so "001@TO@3" pads to
/// width 3.
fn expand_range(name: &str, level: Level) -> Result<Vec<String>, NameFormattingError> {
    let malformed = || NameFormattingError::MalformedRange {
        name: name.to_string(),
        level,
    };

    let body = name
        .strip_prefix(level.prefix())
        .and_then(|rest| rest.strip_prefix(KEY_VALUE_DELIMITER))
        .ok_or_else(malformed)?;

    let (head, tail) = match body.split_once(TOKEN_SEPARATOR) {
        Some((head, tail)) => (head, Some(tail)),
        None => (body, None),
    };

    if tail.is_some_and(|t| t.contains(TO_TAG)) {
        return Err(malformed());
    }

    let (left, right) = head.split_once(TO_TAG).ok_or_else(malformed)?;
    if !is_ascii_digits(left) || !is_ascii_digits(right) {
        return Err(malformed());
    }

    let start: u32 = left.parse().map_err(|_| malformed())?;
    let end: u32 = right.parse().map_err(|_| malformed())?;
    if start > end {
        return Err(NameFormattingError::RangeOutOfOrder {
            name: name.to_string(),
        });
    }

    let width = left.len().max(right.len());
    let expanded = (start..=end)
        .map(|num| {
            let value = format!("{num:0width$}");
            match tail {
                Some(tail) => format!("{}-{value}_{tail}", level.prefix()),
                None => format!("{}-{value}", level.prefix()),
            }
        })
        .collect();

    Ok(expanded)
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut deduped: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !deduped.contains(&name) {
            deduped.push(name);
        }
    }
    deduped
}

/// After exact duplicates are removed, any two remaining names sharing a
/// prefix id describe the same entity with conflicting token sets.
fn check_no_conflicting_ids(names: &[String], level: Level) -> Result<(), NameFormattingError> {
    for (i, first) in names.iter().enumerate() {
        if first.contains(WILDCARD_TAG) {
            continue;
        }
        for second in &names[i + 1..] {
            if second.contains(WILDCARD_TAG) {
                continue;
            }
            if tags::same_prefix_id(first, second, level) {
                return Err(NameFormattingError::ConflictingNames {
                    first: first.clone(),
                    second: second.clone(),
                    level,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::fixed_clock;

    fn format(raw: &[&str], level: Level) -> Result<Vec<String>, NameFormattingError> {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        format_names(&raw, level, &fixed_clock(), WildcardPolicy::Reject)
    }

    fn format_for_transfer(
        raw: &[&str],
        level: Level,
    ) -> Result<Vec<String>, NameFormattingError> {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        format_names(&raw, level, &fixed_clock(), WildcardPolicy::Allow)
    }

    #[test]
    fn prepends_missing_prefix() {
        assert_eq!(format(&["001"], Level::Sub).unwrap(), vec!["sub-001"]);
        assert_eq!(format(&["02"], Level::Ses).unwrap(), vec!["ses-02"]);
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = format(&["001", "sub-002_id-a"], Level::Sub).unwrap();
        let raw: Vec<String> = once.clone();
        let twice = format_names(&raw, Level::Sub, &fixed_clock(), WildcardPolicy::Reject).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn splits_comma_joined_input() {
        assert_eq!(
            format(&["001, 002,003"], Level::Sub).unwrap(),
            vec!["sub-001", "sub-002", "sub-003"]
        );
    }

    #[test]
    fn mixed_prefixed_and_unprefixed() {
        assert_eq!(
            format(&["1", "sub-four", "5"], Level::Sub).unwrap(),
            vec!["sub-1", "sub-four", "sub-5"]
        );
    }

    #[test]
    fn expands_range_with_padding() {
        assert_eq!(
            format(&["001@TO@003"], Level::Sub).unwrap(),
            vec!["sub-001", "sub-002", "sub-003"]
        );
    }

    #[test]
    fn range_padding_uses_widest_endpoint() {
        assert_eq!(
            format(&["001@TO@3"], Level::Sub).unwrap(),
            vec!["sub-001", "sub-002", "sub-003"]
        );
        assert_eq!(
            format(&["8@TO@10"], Level::Ses).unwrap(),
            vec!["ses-08", "ses-09", "ses-10"]
        );
    }

    #[test]
    fn range_carries_trailing_tokens() {
        assert_eq!(
            format(&["sub-1@TO@3_id-a"], Level::Sub).unwrap(),
            vec!["sub-1_id-a", "sub-2_id-a", "sub-3_id-a"]
        );
    }

    #[test]
    fn range_mixed_with_plain_names() {
        assert_eq!(
            format(&["sub-001", "sub-002@TO@004"], Level::Sub).unwrap(),
            vec!["sub-001", "sub-002", "sub-003", "sub-004"]
        );
    }

    #[test]
    fn equal_range_endpoints_give_single_name() {
        assert_eq!(format(&["2@TO@2"], Level::Sub).unwrap(), vec!["sub-2"]);
    }

    #[test]
    fn range_endpoints_out_of_order() {
        assert!(matches!(
            format(&["05@TO@02"], Level::Sub),
            Err(NameFormattingError::RangeOutOfOrder { .. })
        ));
    }

    #[test]
    fn range_with_non_numeric_endpoint() {
        assert!(matches!(
            format(&["01@TO@1M1"], Level::Sub),
            Err(NameFormattingError::MalformedRange { .. })
        ));
    }

    #[test]
    fn range_outside_prefix_token() {
        assert!(matches!(
            format(&["sub-001_id-1@TO@3"], Level::Sub),
            Err(NameFormattingError::MalformedRange { .. })
        ));
    }

    #[test]
    fn exact_duplicates_are_dropped() {
        assert_eq!(
            format(&["sub-001,sub-001"], Level::Sub).unwrap(),
            vec!["sub-001"]
        );
    }

    #[test]
    fn conflicting_ids_are_rejected() {
        assert!(matches!(
            format(&["sub-001", "sub-001_id-a"], Level::Sub),
            Err(NameFormattingError::ConflictingNames { .. })
        ));
        assert!(matches!(
            format(&["sub-01", "sub-001"], Level::Sub),
            Err(NameFormattingError::ConflictingNames { .. })
        ));
    }

    #[test]
    fn spaces_are_rejected() {
        assert!(matches!(
            format(&["sub 001"], Level::Sub),
            Err(NameFormattingError::ContainsSpaces { level: Level::Sub })
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            format(&["001,,002"], Level::Sub),
            Err(NameFormattingError::EmptyName)
        ));
    }

    #[test]
    fn datetime_tag_is_substituted_and_parses_back() {
        let result = format(&["sub-003_@DATETIME@"], Level::Sub).unwrap();
        assert_eq!(result, vec!["sub-003_datetime-20240517T143005"]);

        let tokens = tags::split_into_tokens(&result[0]).unwrap();
        assert_eq!(tokens[0], ("sub", "003"));
        assert_eq!(tokens[1].0, "datetime");
        assert!(!result[0].contains('@'));
    }

    #[test]
    fn wildcard_names_pass_through_for_transfer() {
        assert_eq!(
            format_for_transfer(&["sub-0@*@"], Level::Sub).unwrap(),
            vec!["sub-0@*@"]
        );
    }

    #[test]
    fn wildcard_names_are_rejected_outside_transfer() {
        assert!(matches!(
            format(&["sub-0@*@"], Level::Sub),
            Err(NameFormattingError::DisallowedCharacters { .. })
        ));
    }

    #[test]
    fn malformed_token_structure_is_rejected() {
        assert!(matches!(
            format(&["sub-001_badtoken"], Level::Sub),
            Err(NameFormattingError::MalformedTokens { .. })
        ));
    }
}
