use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Point-in-time view of a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub enabled: bool,
    pub path: Option<PathBuf>,
    pub entries: usize,
    pub dirty: bool,
    pub last_flush: Option<DateTime<Utc>>,
}

impl CacheStats {
    /// Minutes since the last successful flush
    pub fn flush_age_minutes(&self) -> Option<i64> {
        self.last_flush
            .map(|flushed_at| (Utc::now() - flushed_at).num_minutes())
    }

    pub fn last_flush_display(&self) -> String {
        self.flush_age_minutes()
            .map(format_age)
            .unwrap_or_else(|| "never".to_string())
    }
}

/// Render an age in minutes as "just now", "5m ago", "2h ago" or "3d ago".
pub fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        let remaining_mins = minutes % 60;
        if remaining_mins >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        let remaining_hours = (minutes % 1440) / 60;
        if remaining_hours >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn stats_flushed_at(last_flush: Option<DateTime<Utc>>) -> CacheStats {
        CacheStats {
            enabled: true,
            path: Some(PathBuf::from("cache.json")),
            entries: 0,
            dirty: false,
            last_flush,
        }
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(-3), "just now");
        assert_eq!(format_age(0), "just now");
        assert_eq!(format_age(5), "5m ago");
        assert_eq!(format_age(89), "1h ago");
        assert_eq!(format_age(90), "2h ago");
        assert_eq!(format_age(1440 + 60), "1d ago");
        assert_eq!(format_age(1440 + 12 * 60), "2d ago");
    }

    #[test]
    fn test_last_flush_display_never() {
        assert_eq!(stats_flushed_at(None).last_flush_display(), "never");
    }

    #[test]
    fn test_last_flush_display_recent() {
        let stats = stats_flushed_at(Some(Utc::now()));
        assert_eq!(stats.last_flush_display(), "just now");

        let stats = stats_flushed_at(Some(Utc::now() - Duration::minutes(61)));
        assert_eq!(stats.flush_age_minutes(), Some(61));
        assert_eq!(stats.last_flush_display(), "1h ago");
    }
}
