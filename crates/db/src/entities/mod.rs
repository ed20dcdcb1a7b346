//! Database entities.

pub mod admin;
pub mod contest;
pub mod contestant;
pub mod invite;
pub mod ledger_entry;
pub mod tally;

pub use admin::Entity as Admin;
pub use contest::Entity as Contest;
pub use contestant::Entity as Contestant;
pub use invite::Entity as Invite;
pub use ledger_entry::Entity as LedgerEntry;
pub use tally::Entity as Tally;
