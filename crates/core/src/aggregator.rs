//! Ranking and progress over a contest's tally snapshot.
//!
//! Everything here is a pure function of its input: the same rows always
//! produce the same standings.

use voteboard_db::entities::tally;

/// A row that carries a contestant's vote count.
pub trait Tallied {
    /// Contestant the votes belong to.
    fn contestant_id(&self) -> &str;

    /// Cumulative votes.
    fn votes(&self) -> i64;
}

impl Tallied for tally::Model {
    fn contestant_id(&self) -> &str {
        &self.contestant_id
    }

    fn votes(&self) -> i64 {
        self.vote
    }
}

/// A ranked row.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<T> {
    /// 1-based position.
    pub position: usize,
    /// Votes as a percentage of the leader's, two decimals.
    pub progress: f64,
    /// The ranked row.
    pub entry: T,
}

/// One contest membership, for cross-contest averages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipProgress {
    /// Progress within that contest.
    pub progress: f64,
    /// Whether the contest is no longer active.
    pub expired: bool,
}

/// Rank rows by votes, highest first.
///
/// The sort is stable, so rows with equal votes keep their input order.
#[must_use]
pub fn rank<T: Tallied>(mut rows: Vec<T>) -> Vec<Standing<T>> {
    rows.sort_by(|a, b| b.votes().cmp(&a.votes()));
    let leader = leader_votes(&rows);

    rows.into_iter()
        .enumerate()
        .map(|(i, entry)| Standing {
            position: i + 1,
            progress: progress_percent(entry.votes(), leader),
            entry,
        })
        .collect()
}

/// Votes of the leading row, 0 when there are no rows.
#[must_use]
pub fn leader_votes<T: Tallied>(rows: &[T]) -> i64 {
    rows.iter().map(Tallied::votes).max().unwrap_or(0)
}

/// `votes / leader * 100`, rounded to two decimals. 0 when the leader has no votes.
#[must_use]
pub fn progress_percent(votes: i64, leader: i64) -> f64 {
    if leader <= 0 {
        return 0.0;
    }
    round2(votes as f64 / leader as f64 * 100.0)
}

/// Position of a contestant within ranked standings.
#[must_use]
pub fn position_of<T: Tallied>(standings: &[Standing<T>], contestant_id: &str) -> Option<usize> {
    standings
        .iter()
        .find(|s| s.entry.contestant_id() == contestant_id)
        .map(|s| s.position)
}

/// Mean progress across non-expired memberships, two decimals.
///
/// Expired memberships count toward neither the sum nor the divisor.
#[must_use]
pub fn average_progress(items: &[MembershipProgress]) -> f64 {
    let (sum, count) = items
        .iter()
        .filter(|m| !m.expired)
        .fold((0.0, 0_u32), |(sum, count), m| (sum + m.progress, count + 1));

    if count == 0 {
        return 0.0;
    }
    round2(sum / f64::from(count))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
