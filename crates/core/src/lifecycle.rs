//! Contest lifecycle: effective status, remaining time and elapsed time.
//!
//! The effective status is computed at read time and never written back.
//! `now` is always passed in.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use voteboard_db::entities::contest::{self, ContestStatus};

const DAY_MS: i64 = 86_400_000;

/// Status of a contest as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    /// Open for voting.
    Active,
    /// Stored expired, or stored active with its end date passed.
    Expired,
    /// Closed by an administrator.
    Complete,
}

impl EffectiveStatus {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Complete => "complete",
        }
    }

    /// UI alias: `active`, or `inactive` for both closed states.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired | Self::Complete => "inactive",
        }
    }

    /// Whether the contest still takes votes.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Derive the effective status of a contest at `now`.
#[must_use]
pub fn effective_status(contest: &contest::Model, now: DateTime<Utc>) -> EffectiveStatus {
    match contest.status {
        ContestStatus::Complete => EffectiveStatus::Complete,
        ContestStatus::Expired => EffectiveStatus::Expired,
        ContestStatus::Active if now > contest.end_date => EffectiveStatus::Expired,
        ContestStatus::Active => EffectiveStatus::Active,
    }
}

/// Whole days left until `end`, rounded up.
#[must_use]
pub fn remaining_days(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (end - now).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values.
    if ms > 0 && ms % DAY_MS != 0 {
        ms / DAY_MS + 1
    } else {
        ms / DAY_MS
    }
}

/// Human text for the time left in a contest.
#[must_use]
pub fn remaining_label(status: EffectiveStatus, end: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if status.is_active() {
        format!("{} days left", remaining_days(end, now))
    } else {
        "Contest has expired".to_string()
    }
}

/// Instant from which a finished contest counts as over.
///
/// `updated_at` for a completed contest, `end_date` for one still stored
/// active past its end, `None` otherwise.
#[must_use]
pub fn lapse_instant(contest: &contest::Model, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match contest.status {
        ContestStatus::Complete => Some(contest.updated_at),
        ContestStatus::Active if contest.end_date < now => Some(contest.end_date),
        _ => None,
    }
}

/// Format an elapsed duration using its two largest units.
///
/// `"3 days, 4 hours ago"`, `"2 hours, 5 minutes ago"`,
/// `"7 minutes, 0 seconds ago"` or `"12 seconds ago"`.
#[must_use]
pub fn format_time_passed(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().abs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days} days, {} hours ago", hours % 24)
    } else if hours > 0 {
        format!("{hours} hours, {} minutes ago", minutes % 60)
    } else if minutes > 0 {
        format!("{minutes} minutes, {} seconds ago", seconds % 60)
    } else {
        format!("{seconds} seconds ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest_with(status: ContestStatus, end_date: DateTime<Utc>) -> contest::Model {
        let created = end_date - Duration::days(30);
        contest::Model {
            id: "c1".to_string(),
            name: "Spring Cup".to_string(),
            start_date: created,
            end_date,
            status,
            no_votes: 0,
            revenue: 0.0,
            created_at: created,
            updated_at: created,
            deleted_at: None,
        }
    }

    #[test]
    fn test_effective_status_active_before_end() {
        let now = Utc::now();
        let contest = contest_with(ContestStatus::Active, now + Duration::days(2));

        let status = effective_status(&contest, now);
        assert_eq!(status, EffectiveStatus::Active);
        assert_eq!(status.alias(), "active");
    }

    #[test]
    fn test_effective_status_active_past_end_is_expired() {
        let now = Utc::now();
        let contest = contest_with(ContestStatus::Active, now - Duration::seconds(1));

        let status = effective_status(&contest, now);
        assert_eq!(status, EffectiveStatus::Expired);
        assert_eq!(status.alias(), "inactive");
    }

    #[test]
    fn test_effective_status_complete_is_terminal() {
        let now = Utc::now();
        let contest = contest_with(ContestStatus::Complete, now + Duration::days(10));

        let status = effective_status(&contest, now);
        assert_eq!(status, EffectiveStatus::Complete);
        assert_eq!(status.alias(), "inactive");
    }

    #[test]
    fn test_effective_status_stored_expired() {
        let now = Utc::now();
        let contest = contest_with(ContestStatus::Expired, now + Duration::days(10));

        assert_eq!(effective_status(&contest, now), EffectiveStatus::Expired);
    }

    #[test]
    fn test_effective_status_still_active_at_end_instant() {
        let now = Utc::now();
        let contest = contest_with(ContestStatus::Active, now);

        assert_eq!(effective_status(&contest, now), EffectiveStatus::Active);
    }

    #[test]
    fn test_remaining_days_rounds_up() {
        let now = Utc::now();

        assert_eq!(remaining_days(now + Duration::days(3), now), 3);
        assert_eq!(remaining_days(now + Duration::days(2) + Duration::hours(1), now), 3);
        assert_eq!(remaining_days(now + Duration::minutes(1), now), 1);
        assert_eq!(remaining_days(now, now), 0);
        assert_eq!(remaining_days(now - Duration::hours(30), now), -1);
    }

    #[test]
    fn test_remaining_label() {
        let now = Utc::now();
        let end = now + Duration::hours(36);

        assert_eq!(
            remaining_label(EffectiveStatus::Active, end, now),
            "2 days left"
        );
        assert_eq!(
            remaining_label(EffectiveStatus::Expired, end, now),
            "Contest has expired"
        );
    }

    #[test]
    fn test_lapse_instant() {
        let now = Utc::now();

        let complete = contest_with(ContestStatus::Complete, now + Duration::days(1));
        assert_eq!(lapse_instant(&complete, now), Some(complete.updated_at));

        let lapsed = contest_with(ContestStatus::Active, now - Duration::days(1));
        assert_eq!(lapse_instant(&lapsed, now), Some(lapsed.end_date));

        let running = contest_with(ContestStatus::Active, now + Duration::days(1));
        assert_eq!(lapse_instant(&running, now), None);
    }

    #[test]
    fn test_format_time_passed() {
        assert_eq!(
            format_time_passed(Duration::days(3) + Duration::hours(4)),
            "3 days, 4 hours ago"
        );
        assert_eq!(
            format_time_passed(Duration::hours(2) + Duration::minutes(5)),
            "2 hours, 5 minutes ago"
        );
        assert_eq!(
            format_time_passed(Duration::minutes(7)),
            "7 minutes, 0 seconds ago"
        );
        assert_eq!(format_time_passed(Duration::seconds(12)), "12 seconds ago");
        assert_eq!(format_time_passed(Duration::zero()), "0 seconds ago");
    }

    #[test]
    fn test_format_time_passed_ignores_sign() {
        assert_eq!(
            format_time_passed(-Duration::seconds(90)),
            "1 minutes, 30 seconds ago"
        );
    }
}
