use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(day|hour|minute)$").unwrap());

/// Parse a ban duration token of the form `<amount><unit>`.
///
/// The amount is any non-negative integer; the unit is exactly `day`, `hour`
/// or `minute`. Anything else — including amounts too large for the time
/// representation — yields `None` and the caller rejects the command without
/// touching any state.
pub fn parse_ban_duration(token: &str) -> Option<Duration> {
    let lowercased = token.to_lowercase();
    let caps = DURATION_RE.captures(&lowercased)?;
    let amount: i64 = caps[1].parse().ok()?;

    match &caps[2] {
        "day" => Duration::try_days(amount),
        "hour" => Duration::try_hours(amount),
        "minute" => Duration::try_minutes(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_each_unit() {
        assert_eq!(parse_ban_duration("7day"), Some(Duration::days(7)));
        assert_eq!(parse_ban_duration("5hour"), Some(Duration::hours(5)));
        assert_eq!(parse_ban_duration("30minute"), Some(Duration::minutes(30)));
    }

    #[test]
    fn test_case_is_ignored() {
        assert_eq!(parse_ban_duration("7DAY"), Some(Duration::days(7)));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert_eq!(parse_ban_duration("abc"), None);
        assert_eq!(parse_ban_duration("7"), None);
        assert_eq!(parse_ban_duration("day7"), None);
        assert_eq!(parse_ban_duration("7week"), None);
        assert_eq!(parse_ban_duration("7 day"), None);
        assert_eq!(parse_ban_duration("-7day"), None);
        assert_eq!(parse_ban_duration(""), None);
    }

    #[test]
    fn test_rejects_amounts_beyond_the_time_representation() {
        // Does not fit in i64 at all
        assert_eq!(parse_ban_duration("99999999999999999999day"), None);
        // Fits in i64 but overflows a duration
        assert_eq!(parse_ban_duration("9999999999999day"), None);
    }
}
