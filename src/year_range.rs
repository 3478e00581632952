//! Typed year-range bounds and their delayed correction.
//!
//! Year bounds are edited as text. Every edit takes effect immediately when it
//! parses, and schedules a correction that clamps both bounds into the
//! dataset's year limits once the user has stopped typing. A new edit cancels
//! the pending correction and schedules a fresh one, so a value that is still
//! being typed is never clamped.

use crate::filter::YearRange;
use std::time::{Duration, Instant};

/// Delay between the last edit and the correction.
pub const DEFAULT_CORRECTION_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    From,
    Until,
}

/// A cancellable task scheduled at a deadline.
///
/// Scheduling replaces any pending deadline, so only the most recent
/// schedule can ever fire.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    due: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending deadline and schedule a new one.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.due
    }

    /// True exactly once when the pending deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

pub fn parse_year(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Correct a typed bound against the dataset limits.
///
/// Text that does not parse, or a year outside `[min, max]`, resets to the
/// bound's own limit. Without limits the parsed value is kept as is.
pub fn sanitize_year(text: &str, bound: Bound, limits: Option<(i64, i64)>) -> Option<i64> {
    let parsed = parse_year(text);
    let Some((min, max)) = limits.filter(|(min, max)| min <= max) else {
        return parsed;
    };
    let own_limit = match bound {
        Bound::From => min,
        Bound::Until => max,
    };
    match parsed {
        Some(year) if (min..=max).contains(&year) => Some(year),
        _ => Some(own_limit),
    }
}

/// Text state of the from/until inputs plus the pending correction.
#[derive(Debug, Clone)]
pub struct YearRangeInput {
    from: String,
    until: String,
    limits: Option<(i64, i64)>,
    correction: Debounce,
}

impl YearRangeInput {
    /// Inputs start at the dataset limits, or empty without dated records.
    pub fn new(limits: Option<(i64, i64)>, delay: Duration) -> Self {
        let (from, until) = match limits {
            Some((min, max)) => (min.to_string(), max.to_string()),
            None => (String::new(), String::new()),
        };
        Self {
            from,
            until,
            limits,
            correction: Debounce::new(delay),
        }
    }

    pub fn text(&self, bound: Bound) -> &str {
        match bound {
            Bound::From => &self.from,
            Bound::Until => &self.until,
        }
    }

    pub fn limits(&self) -> Option<(i64, i64)> {
        self.limits
    }

    /// The range the inputs start with.
    pub fn initial_range(&self) -> YearRange {
        match self.limits {
            Some((min, max)) => YearRange::new(min, max),
            None => YearRange::unbounded(),
        }
    }

    pub fn correction_pending(&self) -> bool {
        self.correction.is_pending()
    }

    pub fn correction_due_at(&self) -> Option<Instant> {
        self.correction.due_at()
    }

    /// Replace one bound's text, reschedule the correction and return the
    /// live range. Text that does not parse leaves that side of `current`.
    pub fn edit(&mut self, bound: Bound, text: &str, current: YearRange, now: Instant) -> YearRange {
        match bound {
            Bound::From => self.from = text.to_string(),
            Bound::Until => self.until = text.to_string(),
        }
        self.correction.schedule(now);
        YearRange::new(
            parse_year(&self.from).unwrap_or(current.min),
            parse_year(&self.until).unwrap_or(current.max),
        )
    }

    /// Apply the correction if it is due, returning the corrected range.
    pub fn poll(&mut self, now: Instant) -> Option<YearRange> {
        if !self.correction.fire(now) {
            return None;
        }
        Some(self.correct())
    }

    /// Apply the correction now, cancelling the pending one.
    pub fn correct(&mut self) -> YearRange {
        self.correction.cancel();
        let from = sanitize_year(&self.from, Bound::From, self.limits);
        let until = sanitize_year(&self.until, Bound::Until, self.limits);
        self.from = from.map(|y| y.to_string()).unwrap_or_default();
        self.until = until.map(|y| y.to_string()).unwrap_or_default();
        YearRange::new(from.unwrap_or(i64::MIN), until.unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: Option<(i64, i64)> = Some((1500, 1800));

    #[test]
    fn test_sanitize_keeps_years_in_range() {
        assert_eq!(sanitize_year("1400", Bound::From, LIMITS), Some(1500));
        assert_eq!(sanitize_year("1900", Bound::Until, LIMITS), Some(1800));
        assert_eq!(sanitize_year("1650", Bound::From, LIMITS), Some(1650));
    }

    #[test]
    fn test_sanitize_out_of_range_resets_to_own_limit() {
        assert_eq!(sanitize_year("1900", Bound::From, LIMITS), Some(1500));
        assert_eq!(sanitize_year("1400", Bound::Until, LIMITS), Some(1800));
        assert_eq!(sanitize_year("1800", Bound::From, LIMITS), Some(1800));
        assert_eq!(sanitize_year("1500", Bound::Until, LIMITS), Some(1500));
    }

    #[test]
    fn test_sanitize_unparsable_uses_own_limit() {
        assert_eq!(sanitize_year("", Bound::From, LIMITS), Some(1500));
        assert_eq!(sanitize_year("abc", Bound::Until, LIMITS), Some(1800));
    }

    #[test]
    fn test_sanitize_without_limits() {
        assert_eq!(sanitize_year("42", Bound::From, None), Some(42));
        assert_eq!(sanitize_year("", Bound::From, None), None);
    }

    #[test]
    fn test_debounce_fires_once_after_delay() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_secs(1));
        d.schedule(start);
        assert!(!d.fire(start + Duration::from_millis(999)));
        assert!(d.fire(start + Duration::from_secs(1)));
        assert!(!d.fire(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_debounce_reschedule_supersedes() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_secs(1));
        d.schedule(start);
        d.schedule(start + Duration::from_millis(800));
        assert!(!d.fire(start + Duration::from_millis(1200)));
        assert!(d.fire(start + Duration::from_millis(1800)));
    }

    #[test]
    fn test_debounce_cancel() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_secs(1));
        d.schedule(start);
        d.cancel();
        assert!(!d.fire(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_edit_is_live_and_correction_is_delayed() {
        let start = Instant::now();
        let mut input = YearRangeInput::new(LIMITS, Duration::from_secs(1));
        let current = input.initial_range();

        let live = input.edit(Bound::From, "1", current, start);
        assert_eq!(live, YearRange::new(1, 1800));
        assert_eq!(input.poll(start + Duration::from_millis(500)), None);

        let live = input.edit(Bound::From, "16", live, start + Duration::from_millis(600));
        assert_eq!(live, YearRange::new(16, 1800));
        assert_eq!(input.poll(start + Duration::from_millis(1200)), None);

        let corrected = input.poll(start + Duration::from_millis(1600));
        assert_eq!(corrected, Some(YearRange::new(1500, 1800)));
        assert_eq!(input.text(Bound::From), "1500");
    }

    #[test]
    fn test_unparsable_edit_keeps_previous_side() {
        let start = Instant::now();
        let mut input = YearRangeInput::new(LIMITS, Duration::from_secs(1));
        let current = YearRange::new(1600, 1700);
        let live = input.edit(Bound::Until, "", current, start);
        assert_eq!(live, YearRange::new(1500, 1700));
        assert_eq!(input.correct(), YearRange::new(1500, 1800));
        assert_eq!(input.text(Bound::Until), "1800");
    }

    #[test]
    fn test_initial_text_from_limits() {
        let input = YearRangeInput::new(LIMITS, DEFAULT_CORRECTION_DELAY);
        assert_eq!(input.text(Bound::From), "1500");
        assert_eq!(input.text(Bound::Until), "1800");
        assert_eq!(input.initial_range(), YearRange::new(1500, 1800));

        let empty = YearRangeInput::new(None, DEFAULT_CORRECTION_DELAY);
        assert_eq!(empty.initial_range(), YearRange::unbounded());
    }
}
