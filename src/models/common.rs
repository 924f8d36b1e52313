//! Shared DTO helpers for list endpoints.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Default list page size for catalog list views.
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// serde default for list query `limit` fields.
pub fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Clamp pagination parameters to sane bounds.
pub fn clamp_limit(limit: u64) -> u64 {
    limit.clamp(1, 100)
}

/// Minimal projection used by dependent-dropdown endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IdNome {
    pub id: Uuid,
    pub nome: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_to_bounds() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(12), 12);
        assert_eq!(clamp_limit(5000), 100);
    }
}
