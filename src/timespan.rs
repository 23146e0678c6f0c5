//! Timespans
//!
//! Parses human-friendly durations like `90`, `1h30m` or
//! `"2 hours 30 minutes"` into seconds. Used for the `--timeout` flag so
//! operators do not have to do the seconds arithmetic themselves. Terms
//! combine additively; bare numbers are seconds.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// One `<number><unit>` term; terms may be separated by whitespace.
static TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*([a-zA-Zμµ]*)").expect("static regex"));

/// Parses a timespan specification into seconds.
///
/// ```
/// use sondeur::timespan;
///
/// assert_eq!(timespan::parse("1h30m").unwrap(), 5400.0);
/// assert_eq!(timespan::parse("45.5s").unwrap(), 45.5);
/// ```
pub fn parse(spec: &str) -> Result<f64> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidTimespan(spec.to_string()));
    }
    let mut total = 0.0;
    let mut consumed = 0;
    for caps in TERM.captures_iter(trimmed) {
        let whole = caps.get(0).expect("regex match has group 0");
        // Only whitespace may sit between terms.
        if trimmed[consumed..whole.start()]
            .chars()
            .any(|c| !c.is_whitespace())
        {
            return Err(Error::InvalidTimespan(spec.to_string()));
        }
        consumed = whole.end();
        let value: f64 = caps[1]
            .parse()
            .map_err(|_| Error::InvalidTimespan(spec.to_string()))?;
        let factor =
            unit_factor(&caps[2]).ok_or_else(|| Error::InvalidTimespan(spec.to_string()))?;
        total += value * factor;
    }
    if consumed == 0
        || trimmed[consumed..]
            .chars()
            .any(|c| !c.is_whitespace())
    {
        return Err(Error::InvalidTimespan(spec.to_string()));
    }
    Ok(total)
}

/// Parses a timespan into a [`Duration`], for clap value parsers.
pub fn parse_duration(spec: &str) -> Result<Duration> {
    let seconds = parse(spec)?;
    if seconds < 0.0 || !seconds.is_finite() {
        return Err(Error::InvalidTimespan(spec.to_string()));
    }
    Ok(Duration::from_secs_f64(seconds))
}

/// Seconds per unit.
///
/// A month is 30.44 days, a year 365.25 days; `m` is minutes, `M` months.
fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        "ms" | "msec" | "msecs" => Some(1e-3),
        "us" | "usec" | "usecs" | "\u{3bc}s" | "\u{b5}s" => Some(1e-6),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60.0),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(3600.0),
        "d" | "day" | "days" => Some(86_400.0),
        "w" | "week" | "weeks" => Some(604_800.0),
        "M" | "month" | "months" => Some(2_630_016.0),
        "y" | "year" | "years" => Some(31_557_600.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::Error;

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_bare_numbers_are_seconds() {
        assert_eq!(parse("5").unwrap(), 5.0);
        assert_eq!(parse("5.5").unwrap(), 5.5);
    }

    #[test]
    fn test_microseconds() {
        close(parse("1\u{3bc}s").unwrap(), 0.000_001);
        close(parse("1.2usec").unwrap(), 0.000_001_2);
    }

    #[test]
    fn test_milliseconds() {
        close(parse("1msec").unwrap(), 0.001);
        close(parse("1.2345ms").unwrap(), 0.001_234_5);
    }

    #[test]
    fn test_seconds() {
        assert_eq!(parse("5s").unwrap(), 5.0);
        assert_eq!(parse("45.5s").unwrap(), 45.5);
    }

    #[test]
    fn test_minutes() {
        assert_eq!(parse("1m").unwrap(), 60.0);
        assert_eq!(parse("2min").unwrap(), 120.0);
        assert_eq!(parse("3minutes").unwrap(), 180.0);
    }

    #[test]
    fn test_hours() {
        assert_eq!(parse("1h").unwrap(), 3600.0);
        assert_eq!(parse("2hr").unwrap(), 7200.0);
        assert_eq!(parse("3 hours").unwrap(), 10800.0);
    }

    #[test]
    fn test_days_weeks() {
        assert_eq!(parse("1d").unwrap(), 86_400.0);
        assert_eq!(parse("2days").unwrap(), 172_800.0);
        assert_eq!(parse("1w").unwrap(), 604_800.0);
        assert_eq!(parse("2weeks").unwrap(), 1_209_600.0);
    }

    #[test]
    fn test_months_and_years() {
        assert_eq!(parse("1M").unwrap(), 2_630_016.0);
        assert_eq!(parse("2months").unwrap(), 5_260_032.0);
        assert_eq!(parse("1y").unwrap(), 31_557_600.0);
        assert_eq!(parse("2years").unwrap(), 63_115_200.0);
    }

    #[test]
    fn test_combined_terms() {
        assert_eq!(parse("1h30m").unwrap(), 5400.0);
        assert_eq!(parse("2 months 8 days").unwrap(), 5_951_232.0);
        close(parse("3min 45.234s").unwrap(), 225.234);
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(parse("5 s").unwrap(), 5.0);
        assert_eq!(parse("  10  minutes  ").unwrap(), 600.0);
    }

    #[test]
    fn test_decimal_values() {
        assert_eq!(parse("1.5h").unwrap(), 5400.0);
        assert_eq!(parse("2.5d").unwrap(), 216_000.0);
    }

    #[test]
    fn test_rejects_garbage() {
        for spec in ["", "   ", "h", "5 parsecs", "1h bogus", "one hour", "-5s"] {
            assert_matches!(
                parse(spec),
                Err(Error::InvalidTimespan(_)),
                "spec {spec:?} should not parse"
            );
        }
    }

    #[test]
    fn test_duration_conversion() {
        assert_eq!(
            parse_duration("90s").unwrap(),
            std::time::Duration::from_secs(90)
        );
        assert_matches!(parse_duration("nope"), Err(Error::InvalidTimespan(_)));
    }
}
