//! Leaderboard service: rankings, memberships and contest results.
//!
//! Every view ranks contestants against the leader of the same contest.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use voteboard_common::{AppError, AppResult};
use voteboard_db::{
    entities::{contest, contestant, ledger_entry, tally},
    repositories::{ContestRepository, ContestantRepository, LedgerRepository, TallyRepository},
};

use crate::{
    aggregator::{
        MembershipProgress, Standing, average_progress, leader_votes, position_of,
        progress_percent, rank,
    },
    lifecycle::{
        EffectiveStatus, effective_status, format_time_passed, lapse_instant, remaining_label,
    },
};

/// Leaderboard service for read-side business logic.
#[derive(Clone)]
pub struct LeaderboardService {
    contest_repo: ContestRepository,
    tally_repo: TallyRepository,
    contestant_repo: ContestantRepository,
    ledger_repo: LedgerRepository,
}

/// A ranked tally row joined with its contestant's profile.
#[derive(Debug, Clone)]
pub struct RankedContestant {
    pub position: usize,
    pub progress: f64,
    pub tally: tally::Model,
    /// `None` when the contestant's account no longer exists.
    pub contestant: Option<contestant::Model>,
}

/// Standings of one contest.
#[derive(Debug, Clone)]
pub struct ContestStandings {
    pub contest: contest::Model,
    pub contestants: Vec<RankedContestant>,
    pub total_contestants: u64,
    pub total_votes: i64,
    pub total_revenue: f64,
}

/// One contest a contestant takes part in.
#[derive(Debug, Clone)]
pub struct Membership {
    pub tally: tally::Model,
    pub contest: contest::Model,
    pub status: EffectiveStatus,
    pub position: usize,
    pub progress: f64,
    pub remaining_days: String,
}

/// All memberships of a contestant with cross-contest figures.
#[derive(Debug, Clone)]
pub struct Memberships {
    pub items: Vec<Membership>,
    pub total_active_contests: u64,
    /// Votes across active memberships only.
    pub total_votes: i64,
    pub average_progress: f64,
}

/// Vote purchases for one contestant in one contest.
#[derive(Debug, Clone)]
pub struct TransactionHistory {
    pub contest: contest::Model,
    pub entries: Vec<ledger_entry::Model>,
    pub total_votes: i64,
    /// `None` when the contestant has since been removed from the contest.
    pub rank: Option<usize>,
    pub progress: f64,
    pub status: EffectiveStatus,
    pub remaining_days: String,
}

/// An open contest with its contestants.
#[derive(Debug, Clone)]
pub struct ContestWithContestants {
    pub contest: contest::Model,
    pub contestants: Vec<RankedContestant>,
}

/// A completed or lapsed contest with its final standings.
#[derive(Debug, Clone)]
pub struct FinishedContest {
    pub contest: contest::Model,
    pub contestants: Vec<RankedContestant>,
    pub time_passed: Option<String>,
}

impl FinishedContest {
    /// The winner, if anyone took part.
    #[must_use]
    pub fn top_contestant(&self) -> Option<&RankedContestant> {
        self.contestants.first()
    }
}

impl LeaderboardService {
    /// Create a new leaderboard service.
    #[must_use]
    pub const fn new(
        contest_repo: ContestRepository,
        tally_repo: TallyRepository,
        contestant_repo: ContestantRepository,
        ledger_repo: LedgerRepository,
    ) -> Self {
        Self {
            contest_repo,
            tally_repo,
            contestant_repo,
            ledger_repo,
        }
    }

    /// Ranked contestants of a contest with the contest's totals.
    pub async fn contest_standings(&self, contest_id: &str) -> AppResult<ContestStandings> {
        if contest_id.is_empty() {
            return Err(AppError::Validation("contestId is required.".to_string()));
        }

        let contest = self.contest_repo.get_by_id(contest_id).await?;
        let rows = self.tally_repo.find_by_contest(&contest.id).await?;
        if rows.is_empty() {
            return Err(AppError::NotFound(
                "No contestants found for this contest.".to_string(),
            ));
        }

        let totals = self
            .ledger_repo
            .totals_by_contests(std::slice::from_ref(&contest.id))
            .await?
            .remove(&contest.id)
            .unwrap_or_default();

        let total_contestants = rows.len() as u64;
        let profiles = self.load_profiles(&rows).await?;
        let contestants = join_profiles(rank(rows), &profiles);

        Ok(ContestStandings {
            contest,
            contestants,
            total_contestants,
            total_votes: totals.votes,
            total_revenue: totals.revenue,
        })
    }

    /// Every contest a contestant is in, with position and progress.
    pub async fn memberships(&self, contestant_id: &str) -> AppResult<Memberships> {
        if contestant_id.is_empty() {
            return Err(AppError::Validation("contestantId is required.".to_string()));
        }

        let rows = self.tally_repo.find_by_contestant(contestant_id).await?;
        let contest_ids = unique_contest_ids(&rows);
        let contests: HashMap<String, contest::Model> = self
            .contest_repo
            .find_by_ids(&contest_ids)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let by_contest = group_by_contest(self.tally_repo.find_by_contests(&contest_ids).await?);

        let now = Utc::now();
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(contest) = contests.get(&row.contest_id) else {
                continue;
            };
            let peers = by_contest.get(&row.contest_id).map_or(&[][..], Vec::as_slice);
            let position = rank(peers.to_vec())
                .iter()
                .find(|s| s.entry.id == row.id)
                .map_or(0, |s| s.position);
            let status = effective_status(contest, now);

            items.push(Membership {
                progress: progress_percent(row.vote, leader_votes(peers)),
                position,
                status,
                remaining_days: remaining_label(status, contest.end_date, now),
                contest: contest.clone(),
                tally: row,
            });
        }

        if items.is_empty() {
            return Err(AppError::NotFound(
                "No contests found for this contestant.".to_string(),
            ));
        }

        let active: Vec<&Membership> = items.iter().filter(|m| m.status.is_active()).collect();
        let progress: Vec<MembershipProgress> = items
            .iter()
            .map(|m| MembershipProgress {
                progress: m.progress,
                expired: !m.status.is_active(),
            })
            .collect();

        Ok(Memberships {
            total_active_contests: active.len() as u64,
            total_votes: active.iter().map(|m| m.tally.vote).sum(),
            average_progress: average_progress(&progress),
            items,
        })
    }

    /// A contestant's vote purchases in one contest.
    pub async fn transaction_history(
        &self,
        contest_id: &str,
        contestant_id: &str,
    ) -> AppResult<TransactionHistory> {
        if contest_id.is_empty() || contestant_id.is_empty() {
            return Err(AppError::Validation(
                "ContestId and ContestantId are required.".to_string(),
            ));
        }

        let contest = self.contest_repo.get_by_id(contest_id).await?;
        let entries = self
            .ledger_repo
            .find_by_pair(&contest.id, contestant_id)
            .await?;
        if entries.is_empty() {
            return Err(AppError::NotFound(
                "No transaction history found for this contest.".to_string(),
            ));
        }

        let standings = rank(self.tally_repo.find_by_contest(&contest.id).await?);
        let progress = standings
            .iter()
            .find(|s| s.entry.contestant_id == contestant_id)
            .map_or(0.0, |s| s.progress);

        let now = Utc::now();
        let status = effective_status(&contest, now);

        Ok(TransactionHistory {
            total_votes: entries.iter().map(|e| i64::from(e.vote)).sum(),
            rank: position_of(&standings, contestant_id),
            progress,
            status,
            remaining_days: remaining_label(status, contest.end_date, now),
            entries,
            contest,
        })
    }

    /// Contests open for voting, each with its contestants.
    pub async fn active_contests(&self) -> AppResult<Vec<ContestWithContestants>> {
        let contests = self.contest_repo.find_open(Utc::now()).await?;
        if contests.is_empty() {
            return Err(AppError::NotFound(
                "No active contests found with valid dates.".to_string(),
            ));
        }

        let mut ranked = self.rank_contests(&contests).await?;
        let result: Vec<ContestWithContestants> = contests
            .into_iter()
            .filter_map(|contest| {
                let contestants = ranked.remove(&contest.id)?;
                if contestants.iter().all(|c| c.contestant.is_none()) {
                    return None;
                }
                Some(ContestWithContestants {
                    contest,
                    contestants,
                })
            })
            .collect();

        if result.is_empty() {
            return Err(AppError::NotFound(
                "No active contests found with valid contestants.".to_string(),
            ));
        }
        Ok(result)
    }

    /// Completed contests and active ones past their end date, latest first.
    pub async fn finished_contests(&self) -> AppResult<Vec<FinishedContest>> {
        self.finished_contests_at(Utc::now()).await
    }

    async fn finished_contests_at(&self, now: DateTime<Utc>) -> AppResult<Vec<FinishedContest>> {
        let contests = self.contest_repo.find_finished(now).await?;
        let mut ranked = self.rank_contests(&contests).await?;

        Ok(contests
            .into_iter()
            .map(|contest| FinishedContest {
                contestants: ranked.remove(&contest.id).unwrap_or_default(),
                time_passed: lapse_instant(&contest, now).map(|t| format_time_passed(now - t)),
                contest,
            })
            .collect())
    }

    /// Remove a contestant from a contest. Ledger history is kept.
    pub async fn remove_entry(&self, id: &str) -> AppResult<()> {
        if id.is_empty() {
            return Err(AppError::Validation(
                "Contestant entry id is required.".to_string(),
            ));
        }

        let affected = self.tally_repo.soft_delete(id, Utc::now()).await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "No contestant entry found with id {id}."
            )));
        }

        tracing::info!(tally_id = %id, "Removed contestant from contest");
        Ok(())
    }

    async fn rank_contests(
        &self,
        contests: &[contest::Model],
    ) -> AppResult<HashMap<String, Vec<RankedContestant>>> {
        let ids: Vec<String> = contests.iter().map(|c| c.id.clone()).collect();
        let rows = self.tally_repo.find_by_contests(&ids).await?;
        if rows.is_empty() {
            return Ok(HashMap::new());
        }

        let profiles = self.load_profiles(&rows).await?;
        Ok(group_by_contest(rows)
            .into_iter()
            .map(|(contest_id, rows)| (contest_id, join_profiles(rank(rows), &profiles)))
            .collect())
    }

    async fn load_profiles(
        &self,
        rows: &[tally::Model],
    ) -> AppResult<HashMap<String, contestant::Model>> {
        let mut ids: Vec<String> = rows.iter().map(|r| r.contestant_id.clone()).collect();
        ids.sort();
        ids.dedup();

        Ok(self
            .contestant_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect())
    }
}

fn join_profiles(
    standings: Vec<Standing<tally::Model>>,
    profiles: &HashMap<String, contestant::Model>,
) -> Vec<RankedContestant> {
    standings
        .into_iter()
        .map(|s| RankedContestant {
            position: s.position,
            progress: s.progress,
            contestant: profiles.get(&s.entry.contestant_id).cloned(),
            tally: s.entry,
        })
        .collect()
}

/// Group rows by contest, keeping their order within each contest.
fn group_by_contest(rows: Vec<tally::Model>) -> HashMap<String, Vec<tally::Model>> {
    let mut groups: HashMap<String, Vec<tally::Model>> = HashMap::new();
    for row in rows {
        groups.entry(row.contest_id.clone()).or_default().push(row);
    }
    groups
}

fn unique_contest_ids(rows: &[tally::Model]) -> Vec<String> {
    let mut ids: Vec<String> = rows.iter().map(|r| r.contest_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
}
