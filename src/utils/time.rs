use chrono::DateTime;
use chrono_tz::Tz;

/// Format an RFC 3339 timestamp in the given timezone, e.g. "Wed 01.05.2024 18:00"
pub fn format_event_time(timestamp: &str, timezone: &Tz) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(parsed.with_timezone(timezone).format("%a %d.%m.%Y %H:%M").to_string())
}

/// Parse a timezone name, falling back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or(chrono_tz::UTC)
}

/// Human-readable start-end span of an event
pub fn format_span(start: Option<&str>, end: Option<&str>, timezone: &Tz) -> Option<String> {
    let start = format_event_time(start?, timezone)?;
    match end.and_then(|e| DateTime::parse_from_rfc3339(e).ok()) {
        Some(end) => Some(format!(
            "{} - {}",
            start,
            end.with_timezone(timezone).format("%H:%M")
        )),
        None => Some(start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_target_timezone() {
        let helsinki = parse_timezone("Europe/Helsinki");
        assert_eq!(
            format_event_time("2024-05-01T15:00:00.000000Z", &helsinki).as_deref(),
            Some("Wed 01.05.2024 18:00")
        );
    }

    #[test]
    fn span_with_and_without_end() {
        let utc = parse_timezone("UTC");
        assert_eq!(
            format_span(
                Some("2024-05-01T15:00:00Z"),
                Some("2024-05-01T15:30:00Z"),
                &utc
            )
            .as_deref(),
            Some("Wed 01.05.2024 15:00 - 15:30")
        );
        assert_eq!(
            format_span(Some("2024-05-01T15:00:00Z"), None, &utc).as_deref(),
            Some("Wed 01.05.2024 15:00")
        );
        assert_eq!(format_span(None, None, &utc), None);
    }

    #[test]
    fn unknown_timezone_is_utc() {
        assert_eq!(parse_timezone("Nowhere/Special"), chrono_tz::UTC);
        assert_eq!(format_event_time("yesterday", &chrono_tz::UTC), None);
    }
}
