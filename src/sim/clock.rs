use std::time::{SystemTime, UNIX_EPOCH};

use super::types::HOURS_PER_DAY;

/// An hourly clock over one simulated day.
///
/// # Examples
///
/// ```
/// use pv_offgrid_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut hours = Vec::new();
///
/// clock.run(|hour| hours.push(hour));
/// assert_eq!(hours, vec![0, 1, 2]);
/// ```
pub struct Clock {
    current: usize,
    total: usize,
}

impl Clock {
    /// Creates a clock that runs for `total` hours.
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// A clock covering hours 0..23.
    pub fn day() -> Self {
        Self::new(HOURS_PER_DAY)
    }

    /// Advances the clock by one hour.
    ///
    /// # Returns
    ///
    /// * `Some(hour)` - The hour before advancing
    /// * `None` - If every hour has been visited
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let hour = self.current;
            self.current += 1;
            Some(hour)
        } else {
            None
        }
    }

    /// Calls `f` for each remaining hour.
    pub fn run(&mut self, mut f: impl FnMut(usize)) {
        while let Some(hour) = self.tick() {
            f(hour);
        }
    }
}

/// Hour of day (0..23) of a Unix timestamp shifted by `utc_offset_hours`.
pub fn hour_of_day(unix_secs: u64, utc_offset_hours: i64) -> usize {
    let hours = i128::from(unix_secs / 3600) + i128::from(utc_offset_hours);
    hours.rem_euclid(HOURS_PER_DAY as i128) as usize
}

/// Hour of day (0..23) of the wall clock, in UTC.
///
/// The host time zone is not consulted, so live readings are reproducible
/// across machines.
pub fn wall_clock_hour() -> usize {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    hour_of_day(secs, 0)
}
