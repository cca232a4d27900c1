//! Name validation against the NeuroBlueprint convention.
//!
//! Each name is checked on its own structure, then against the names
//! already present at that level of the project. A duplicate id bound to a
//! different token set is always fatal; digit-width mismatches are fatal
//! only in [`CheckMode::Error`].

use crate::error::NeuroBlueprintError;
use crate::names::tags::{self, Level, WILDCARD_TAG};

/// Policy for non-critical violations: raise on the first one, or collect
/// them as warnings and proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckMode {
    Error,
    Warn,
}

/// Validate candidate names against the existing names at one level.
///
/// Returns the collected warnings on success. `existing` is the union of
/// local and central folder names at that level; for sessions, the names
/// within one specific subject.
pub(crate) fn validate_names(
    candidates: &[String],
    existing: &[String],
    level: Level,
    mode: CheckMode,
) -> Result<Vec<String>, NeuroBlueprintError> {
    let mut warnings = Vec::new();

    for name in candidates {
        if name.contains(WILDCARD_TAG) {
            continue;
        }
        check_name_structure(name, level)?;
        check_does_not_duplicate_existing(name, existing, level)?;
    }

    check_digit_widths(candidates, existing, level, mode, &mut warnings)?;

    Ok(warnings)
}

/// Structure of a single name: prefix first, no duplicate keys, no key
/// from the other level.
pub(crate) fn check_name_structure(name: &str, level: Level) -> Result<(), NeuroBlueprintError> {
    let tokens =
        tags::split_into_tokens(name).map_err(|err| NeuroBlueprintError::Malformed {
            name: name.to_string(),
            reason: err.to_string(),
        })?;

    let Some((first_key, _)) = tokens.first() else {
        return Err(NeuroBlueprintError::MissingPrefix {
            name: name.to_string(),
            level,
        });
    };
    if *first_key != level.prefix() {
        return Err(NeuroBlueprintError::MissingPrefix {
            name: name.to_string(),
            level,
        });
    }

    let mut seen: Vec<&str> = Vec::with_capacity(tokens.len());
    for (key, _) in &tokens {
        if seen.contains(key) {
            return Err(NeuroBlueprintError::DuplicateKey {
                name: name.to_string(),
                key: (*key).to_string(),
            });
        }
        seen.push(key);
    }

    let other = level.other();
    if tokens.iter().skip(1).any(|(key, _)| *key == other.prefix()) {
        return Err(NeuroBlueprintError::OutOfLevelKey {
            name: name.to_string(),
            level,
            other,
        });
    }

    Ok(())
}

/// A new name must not share its id with a differently-labelled existing
/// entity. An exact match is fine (the folder already exists, e.g. when
/// adding sessions under an existing subject).
pub(crate) fn check_does_not_duplicate_existing(
    new: &str,
    existing: &[String],
    level: Level,
) -> Result<(), NeuroBlueprintError> {
    let matched: Vec<&String> = existing
        .iter()
        .filter(|name| tags::same_prefix_id(new, name, level))
        .collect();

    match matched.as_slice() {
        [] => Ok(()),
        [only] if only.as_str() == new => Ok(()),
        [only] => Err(NeuroBlueprintError::DuplicateEntity {
            new: new.to_string(),
            existing: (*only).clone(),
            level,
        }),
        many => Err(NeuroBlueprintError::MultipleMatches {
            new: new.to_string(),
            matches: many.iter().map(|name| (*name).clone()).collect(),
            level,
        }),
    }
}

/// The prefix value must use one digit width across candidates and existing
/// names. Width inference from inconsistent data is ambiguous, so this is
/// reported rather than guessed around.
fn check_digit_widths(
    candidates: &[String],
    existing: &[String],
    level: Level,
    mode: CheckMode,
    warnings: &mut Vec<String>,
) -> Result<(), NeuroBlueprintError> {
    let mut widths: Vec<usize> = Vec::new();
    for name in existing.iter().chain(candidates.iter()) {
        if name.contains(WILDCARD_TAG) {
            continue;
        }
        if let Some(value) = tags::prefix_value(name, level)
            && value.chars().all(|c| c.is_ascii_digit())
            && !widths.contains(&value.len())
        {
            widths.push(value.len());
        }
    }

    if widths.len() > 1 {
        widths.sort_unstable();
        match mode {
            CheckMode::Error => {
                return Err(NeuroBlueprintError::InconsistentDigitWidth { level, widths });
            }
            CheckMode::Warn => warnings.push(format!(
                "Inconsistent value lengths for the {level} key were found (widths: {widths:?}). \
                 Ensure the number of digits for the {level} value are the same and prefixed \
                 with leading zeros if required."
            )),
        }
    }

    Ok(())
}

/// Project-wide check over every existing subject and its sessions.
///
/// In [`CheckMode::Warn`] all violations are collected and returned; in
/// [`CheckMode::Error`] the first violation is raised.
pub(crate) fn validate_project_names(
    sub_names: &[String],
    ses_names_by_sub: &[(String, Vec<String>)],
    mode: CheckMode,
) -> Result<Vec<String>, NeuroBlueprintError> {
    let mut warnings = Vec::new();

    check_level(sub_names, Level::Sub, mode, &mut warnings)?;
    for (_, ses_names) in ses_names_by_sub {
        check_level(ses_names, Level::Ses, mode, &mut warnings)?;
    }

    Ok(warnings)
}

fn check_level(
    names: &[String],
    level: Level,
    mode: CheckMode,
    warnings: &mut Vec<String>,
) -> Result<(), NeuroBlueprintError> {
    for name in names {
        if name.contains(WILDCARD_TAG) {
            continue;
        }
        record(check_name_structure(name, level), mode, warnings)?;
    }

    for (i, first) in names.iter().enumerate() {
        for second in &names[i + 1..] {
            if first != second && tags::same_prefix_id(first, second, level) {
                record(
                    Err(NeuroBlueprintError::DuplicateEntity {
                        new: second.clone(),
                        existing: first.clone(),
                        level,
                    }),
                    mode,
                    warnings,
                )?;
            }
        }
    }

    check_digit_widths(names, &[], level, mode, warnings)
}

fn record(
    result: Result<(), NeuroBlueprintError>,
    mode: CheckMode,
    warnings: &mut Vec<String>,
) -> Result<(), NeuroBlueprintError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => match mode {
            CheckMode::Error => Err(err),
            CheckMode::Warn => {
                warnings.push(err.to_string());
                Ok(())
            }
        },
    }
}
