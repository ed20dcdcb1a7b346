//! Core business logic for voteboard.

pub mod aggregator;
pub mod lifecycle;
pub(crate) mod password;
pub mod services;

pub use lifecycle::EffectiveStatus;
pub use services::*;
