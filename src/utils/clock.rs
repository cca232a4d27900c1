//! Injectable time source.
//!
//! Dynamic-tag substitution is the only impure step in name formatting, so
//! the current time is taken through this trait rather than read ambiently.
//! Tests substitute a fixed clock to keep formatting deterministic.

use chrono::{Local, NaiveDateTime};

pub(crate) trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub(crate) NaiveDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
pub(crate) fn fixed_clock() -> FixedClock {
    use chrono::{NaiveDate, NaiveTime};

    let date = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");
    let time = NaiveTime::from_hms_opt(14, 30, 5).expect("valid time");
    FixedClock(NaiveDateTime::new(date, time))
}
