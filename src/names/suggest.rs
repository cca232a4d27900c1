//! Next-number suggestion.
//!
//! Scans the union of local and central folder names at one level and
//! returns max + 1, zero-padded to the digit width already used in the
//! project. The width never grows automatically: after "sub-999" at width 3
//! the suggestion is "sub-1000".

use crate::error::NeuroBlueprintError;
use crate::names::tags::{self, Level};

/// A suggested subject or session number
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NextNumber {
    /// Canonical name with prefix, e.g. "sub-005"
    pub(crate) name: String,
    pub(crate) value: u32,
    pub(crate) width: usize,
    /// Numbers already in use, sorted ascending
    pub(crate) used: Vec<u32>,
    /// True when the used numbers are not a consecutive run
    pub(crate) skipped: bool,
}

/// Suggest the next free number at the given level.
///
/// Names that do not start with the level prefix are ignored. The digit
/// width is inferred from the existing names and must be consistent;
/// `default_digits` applies only when no names exist yet.
pub(crate) fn suggest_next_number(
    existing: &[String],
    level: Level,
    default_digits: usize,
) -> Result<NextNumber, NeuroBlueprintError> {
    let pairs: Vec<(&String, &str)> = existing
        .iter()
        .filter_map(|name| tags::prefix_value(name, level).map(|value| (name, value)))
        .collect();

    if pairs.is_empty() {
        let width = default_digits;
        return Ok(NextNumber {
            name: format!("{}-{:0width$}", level.prefix(), 1),
            value: 1,
            width,
            used: Vec::new(),
            skipped: false,
        });
    }

    let mut widths: Vec<usize> = pairs.iter().map(|(_, value)| value.len()).collect();
    widths.sort_unstable();
    widths.dedup();
    if widths.len() != 1 {
        return Err(NeuroBlueprintError::InconsistentDigitWidth { level, widths });
    }
    let width = widths[0];

    let mut used: Vec<u32> = Vec::with_capacity(pairs.len());
    for (name, value) in &pairs {
        let num = value
            .parse::<u32>()
            .map_err(|_| NeuroBlueprintError::NonNumericValue {
                name: (*name).clone(),
                level,
            })?;
        used.push(num);
    }
    used.sort_unstable();
    used.dedup();

    let skipped = !integers_are_consecutive(&used);
    let max = used.last().copied().unwrap_or(0);
    let value = max + 1;

    Ok(NextNumber {
        name: format!("{}-{value:0width$}", level.prefix()),
        value,
        width,
        used,
        skipped,
    })
}

fn integers_are_consecutive(nums: &[u32]) -> bool {
    nums.windows(2).all(|pair| pair[1] == pair[0] + 1)
}
