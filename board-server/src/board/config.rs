//! Tunable constants for normalization and reconciliation.

use chrono::Duration;

/// Board behaviour knobs.
///
/// The source data justifies no single "correct" value for several of
/// these (grace window and look-ahead in particular), so they are plain
/// fields with defaults rather than hardcoded constants.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// How long a departed train stays visible as "not past".
    pub grace_mins: i64,

    /// Departures further ahead than this have any live delay reading
    /// suppressed: a reading that far out is either inapplicable or about
    /// to change. Applies whether or not the delay fetch succeeded.
    pub delay_horizon_hours: i64,

    /// Before this local hour, yesterday's timetable is merged in to keep
    /// trains still running past midnight visible.
    pub overnight_cutoff_hour: u32,

    /// Visibility window upper bound: now + this many hours.
    pub lookahead_hours: i64,

    /// Upper bound when the caller asks for tomorrow as well.
    pub extended_lookahead_hours: i64,
}

impl BoardConfig {
    pub fn grace(&self) -> Duration {
        Duration::minutes(self.grace_mins)
    }

    pub fn delay_horizon(&self) -> Duration {
        Duration::hours(self.delay_horizon_hours)
    }

    pub fn lookahead(&self, include_tomorrow: bool) -> Duration {
        if include_tomorrow {
            Duration::hours(self.extended_lookahead_hours)
        } else {
            Duration::hours(self.lookahead_hours)
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grace_mins: 10,
            delay_horizon_hours: 6,
            overnight_cutoff_hour: 4,
            lookahead_hours: 24,
            extended_lookahead_hours: 48,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = BoardConfig::default();
        assert_eq!(config.grace_mins, 10);
        assert_eq!(config.delay_horizon_hours, 6);
        assert_eq!(config.overnight_cutoff_hour, 4);
        assert_eq!(config.lookahead_hours, 24);
        assert_eq!(config.extended_lookahead_hours, 48);
    }

    #[test]
    fn lookahead_extends_with_tomorrow() {
        let config = BoardConfig::default();
        assert_eq!(config.lookahead(false), Duration::hours(24));
        assert_eq!(config.lookahead(true), Duration::hours(48));
    }
}
