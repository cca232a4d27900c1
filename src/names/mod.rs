//! Subject and session name processing.
//!
//! Raw user input is formatted into canonical NeuroBlueprint names
//! (format), checked against the grammar and the names already in the
//! project (validate), and used to suggest the next free number (suggest).
//! Everything here is pure: existing names are passed in by the caller and
//! the current time comes through an injected clock.

pub(crate) mod format;
pub(crate) mod suggest;
pub(crate) mod tags;
pub(crate) mod validate;

pub(crate) use format::{WildcardPolicy, format_names};
pub(crate) use suggest::suggest_next_number;
pub(crate) use tags::Level;
