//! JSON views shared by several endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use voteboard_core::{EffectiveStatus, RankedContestant};
use voteboard_db::entities::{
    contest::{self, ContestStatus},
    contestant, invite, ledger_entry, tally,
};

/// A contest as stored.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestView {
    pub id: String,
    pub contest_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ContestStatus,
    pub no_votes: i64,
    pub revenue: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<contest::Model> for ContestView {
    fn from(c: contest::Model) -> Self {
        Self {
            id: c.id,
            contest_name: c.name,
            start_date: c.start_date,
            end_date: c.end_date,
            status: c.status,
            no_votes: c.no_votes,
            revenue: c.revenue,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Public contestant profile. Never carries the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestantView {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dp: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<contestant::Model> for ContestantView {
    fn from(c: contestant::Model) -> Self {
        Self {
            id: c.id,
            email: c.email,
            name: c.name,
            kind: c.kind,
            dp: c.dp,
            created_at: c.created_at,
        }
    }
}

/// One contestant's entry in one contest.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyView {
    pub id: String,
    pub contestant_id: String,
    pub contest_id: String,
    pub vote: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<tally::Model> for TallyView {
    fn from(t: tally::Model) -> Self {
        Self {
            id: t.id,
            contestant_id: t.contestant_id,
            contest_id: t.contest_id,
            vote: t.vote,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// A ranked tally row with the contestant's profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedView {
    #[serde(flatten)]
    pub entry: TallyView,
    pub position: usize,
    pub progress: f64,
    pub contestant: Option<ContestantView>,
}

impl From<RankedContestant> for RankedView {
    fn from(r: RankedContestant) -> Self {
        Self {
            entry: r.tally.into(),
            position: r.position,
            progress: r.progress,
            contestant: r.contestant.map(Into::into),
        }
    }
}

/// Rank a list of contestants into views.
pub fn ranked(rows: Vec<RankedContestant>) -> Vec<RankedView> {
    rows.into_iter().map(Into::into).collect()
}

/// A vote purchase.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryView {
    pub id: String,
    pub contest_id: String,
    pub contestant_id: String,
    pub name: String,
    pub vote: i32,
    pub payment: f64,
    pub created_at: DateTime<Utc>,
}

impl From<ledger_entry::Model> for LedgerEntryView {
    fn from(e: ledger_entry::Model) -> Self {
        Self {
            id: e.id,
            contest_id: e.contest_id,
            contestant_id: e.contestant_id,
            name: e.name,
            vote: e.vote,
            payment: e.payment,
            created_at: e.created_at,
        }
    }
}

/// A pending invite.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteView {
    pub id: String,
    pub email: String,
    pub contest_id: String,
    pub status: invite::InviteStatus,
    pub created_at: DateTime<Utc>,
}

impl From<invite::Model> for InviteView {
    fn from(i: invite::Model) -> Self {
        Self {
            id: i.id,
            email: i.email,
            contest_id: i.contest_id,
            status: i.status,
            created_at: i.created_at,
        }
    }
}

/// Short contest header used by contestant-facing views.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestHeader {
    pub id: String,
    pub name: String,
    pub status: EffectiveStatus,
    pub end_date: DateTime<Utc>,
}
