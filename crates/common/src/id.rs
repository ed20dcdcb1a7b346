//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs sort lexicographically by creation time, so ordering rows by
    /// `id` follows insertion order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a short random suffix, used for scratch database names.
    #[must_use]
    pub fn generate_suffix(&self) -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }
}
