//! ID generation utilities.

use ulid::Ulid;

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
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

/// Validate an entity ID, rejecting anything that is not a well-formed ULID.
pub fn parse_id(id: &str) -> crate::AppResult<()> {
    Ulid::from_string(&id.to_uppercase())
        .map(|_| ())
        .map_err(|_| crate::AppError::Validation(format!("Malformed id: {id}")))
}
