//! The source of "today" for date defaults and monthly summaries.
//!
//! Handlers never read the wall clock directly. They ask the [Clock] in the
//! application state, so tests can pin the date with a [FixedClock].

use std::fmt::Debug;

use time::{Date, OffsetDateTime};

use crate::{Error, timezone::get_local_offset};

/// Provides the current calendar date.
pub trait Clock: Debug + Send + Sync {
    /// The current date.
    ///
    /// # Errors
    /// Returns an error if the current date cannot be determined, e.g. the
    /// configured timezone is invalid.
    fn today(&self) -> Result<Date, Error>;
}

/// A clock that reads the system time in a local timezone.
#[derive(Debug, Clone)]
pub struct LocalClock {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl LocalClock {
    /// Create a clock for `local_timezone`, a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(local_timezone: &str) -> Result<Self, Error> {
        match get_local_offset(local_timezone) {
            Some(_) => Ok(Self {
                local_timezone: local_timezone.to_owned(),
            }),
            None => Err(Error::InvalidTimezoneError(local_timezone.to_owned())),
        }
    }
}

impl Clock for LocalClock {
    fn today(&self) -> Result<Date, Error> {
        // The offset is looked up on every call since it changes with daylight saving.
        let offset = get_local_offset(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })?;

        Ok(OffsetDateTime::now_utc().to_offset(offset).date())
    }
}

/// A clock that is stuck on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Result<Date, Error> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod clock_tests {
    use time::macros::date;

    use crate::{
        Error,
        clock::{Clock, FixedClock, LocalClock},
    };

    #[test]
    fn fixed_clock_returns_its_date() {
        let clock = FixedClock(date!(2024 - 02 - 29));

        assert_eq!(clock.today(), Ok(date!(2024 - 02 - 29)));
    }

    #[test]
    fn local_clock_rejects_unknown_timezone() {
        let result = LocalClock::new("Not/A_Timezone");

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidTimezoneError("Not/A_Timezone".to_owned()))
        );
    }

    #[test]
    fn local_clock_reads_a_date() {
        let clock = LocalClock::new("Etc/UTC").expect("Could not create clock");

        assert!(clock.today().is_ok());
    }
}
