use chrono::{DateTime, Datelike, Utc};

/// Visit time for the list and preview:
/// - relative under a week ("2h ago", "3d ago")
/// - "Jan 15" within the current year, "Dec 3, 2024" otherwise
pub fn format_visit_time(timestamp: &DateTime<Utc>) -> String {
    format_visit_time_at(timestamp, &Utc::now())
}

pub fn format_visit_time_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp);
    if elapsed.num_days() < 7 {
        return relative(elapsed.num_seconds().max(0));
    }
    if timestamp.year() == now.year() {
        timestamp.format("%b %-d").to_string()
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

fn relative(seconds: i64) -> String {
    match (seconds / 86_400, seconds / 3_600, seconds / 60) {
        (days, _, _) if days > 0 => format!("{}d ago", days),
        (_, hours, _) if hours > 0 => format!("{}h ago", hours),
        (_, _, minutes) if minutes > 0 => format!("{}m ago", minutes),
        _ => "just now".to_string(),
    }
}

/// Full timestamp for the preview pane
pub fn format_full_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn create_test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_tiers() {
        let now = create_test_now();
        assert_eq!(format_visit_time_at(&(now - Duration::seconds(30)), &now), "just now");
        assert_eq!(format_visit_time_at(&(now - Duration::minutes(5)), &now), "5m ago");
        assert_eq!(format_visit_time_at(&(now - Duration::hours(3)), &now), "3h ago");
        assert_eq!(format_visit_time_at(&(now - Duration::days(6)), &now), "6d ago");
    }

    #[test]
    fn test_absolute_same_year() {
        let now = create_test_now();
        let ts = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(format_visit_time_at(&ts, &now), "Jan 15");
    }

    #[test]
    fn test_absolute_other_year() {
        let now = create_test_now();
        let ts = Utc.with_ymd_and_hms(2024, 12, 3, 8, 0, 0).unwrap();
        assert_eq!(format_visit_time_at(&ts, &now), "Dec 3, 2024");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        let now = create_test_now();
        assert_eq!(format_visit_time_at(&(now + Duration::hours(1)), &now), "just now");
    }

    #[test]
    fn test_full_time() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_full_time(&ts), "2025-01-02 03:04:05 UTC");
    }
}
