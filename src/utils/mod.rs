pub(crate) mod clock;
pub(crate) mod debug;

pub(crate) use clock::{Clock, SystemClock};
pub(crate) use debug::{debug_enabled, set_debug};
