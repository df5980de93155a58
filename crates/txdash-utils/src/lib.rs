//! Formatting helpers shared by the dashboard crates

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address pattern"));

/// Strings longer than this are shortened by [`truncate_address`]
const TRUNCATE_THRESHOLD: usize = 10;

/// Check an address against the `0x` + 40 hex pattern
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Coerce a decimal string to `f64`.
///
/// Anything that does not parse to a finite number coerces to `0.0`, the same
/// fallback [`format_amount`] uses for display.
pub fn parse_amount(amount: &str) -> f64 {
    match amount.trim().parse::<f64>() {
        // `+ 0.0` folds -0 into 0 so both sort as one key
        Ok(n) if n.is_finite() => n + 0.0,
        _ => 0.0,
    }
}

/// Render an amount string fixed to 2 decimal places
pub fn format_amount(amount: &str) -> String {
    format!("{:.2}", parse_amount(amount))
}

/// Shorten a long address or hash to `first6...last4`
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= TRUNCATE_THRESHOLD {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a date-time without offset (read as UTC)
/// and a bare date (midnight UTC). Returns `None` for anything else.
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let s = timestamp.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Render a timestamp relative to `now` ("Just now", "5m ago", ...).
///
/// Anything older than a week renders as an absolute `YYYY-MM-DD` date.
pub fn format_relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(at) = parse_timestamp(timestamp) else {
        return "Invalid date".to_string();
    };

    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        at.format("%Y-%m-%d").to_string()
    }
}

/// Escape text for safe inclusion in HTML fragments
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("tx-{}-{}", millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-1234), "-1,234");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("1.5"), "1.50");
        assert_eq!(format_amount("0.123"), "0.12");
        assert_eq!(format_amount(" 42 "), "42.00");
        assert_eq!(format_amount("invalid"), "0.00");
        assert_eq!(format_amount(""), "0.00");
        assert_eq!(format_amount("NaN"), "0.00");
    }

    #[test]
    fn test_parse_amount_fallback() {
        assert_eq!(parse_amount("0.2"), 0.2);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert!(parse_amount("-0").is_sign_positive());
        assert!(parse_amount("-0.0").is_sign_positive());
        assert_eq!(format_amount("-0"), "0.00");
    }

    #[test]
    fn test_is_valid_address() {
        assert!(is_valid_address("0x00000000000000000000000000000000000000aB"));
        assert!(!is_valid_address("0x1234"));
        assert!(!is_valid_address("00000000000000000000000000000000000000000000"));
        assert!(!is_valid_address(" 0x00000000000000000000000000000000000000aB"));
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address(""), "");
        assert_eq!(truncate_address("0x1234"), "0x1234");
        assert_eq!(truncate_address("0123456789"), "0123456789");
        assert_eq!(
            truncate_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"),
            "0x742d...f44e"
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-06-15T10:30:00Z").is_some());
        assert!(parse_timestamp("2024-06-15T10:30:00.123+02:00").is_some());
        assert!(parse_timestamp("2024-06-15T10:30:00").is_some());
        assert_eq!(
            parse_timestamp("2024-06-15"),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap())
        );
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_relative_time_buckets() {
        let at = |d: Duration| (now() - d).to_rfc3339();
        assert_eq!(format_relative_time(&at(Duration::seconds(30)), now()), "Just now");
        assert_eq!(format_relative_time(&at(Duration::minutes(5)), now()), "5m ago");
        assert_eq!(format_relative_time(&at(Duration::hours(3)), now()), "3h ago");
        assert_eq!(format_relative_time(&at(Duration::days(2)), now()), "2d ago");
        assert_eq!(format_relative_time(&at(Duration::days(30)), now()), "2024-05-16");
    }

    #[test]
    fn test_relative_time_invalid_and_future() {
        assert!(format_relative_time("garbage", now()).contains("Invalid"));
        let future = (now() + Duration::hours(1)).to_rfc3339();
        assert_eq!(format_relative_time(&future, now()), "Just now");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
