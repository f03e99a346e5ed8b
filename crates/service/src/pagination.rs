//! Offset pagination for record listings.
//!
//! `PageQuery` deserialises straight from `?skip=&limit=`; missing values fall back to
//! the defaults and `normalize` clamps the window.

use serde::Deserialize;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Largest offset the database drivers accept (bound as `i64`).
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Offset/limit window over non-deleted rows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    /// rows to skip
    pub skip: u64,
    /// rows to return
    pub limit: u64,
}

impl PageQuery {
    pub fn new(skip: u64, limit: u64) -> Self { Self { skip, limit } }

    /// Clamp `skip` to `MAX_SKIP` and `limit` into `1..=MAX_LIMIT`; returns `(offset, limit)`
    pub fn normalize(self) -> (u64, u64) {
        (self.skip.min(MAX_SKIP), self.limit.clamp(1, MAX_LIMIT))
    }
}

impl Default for PageQuery {
    fn default() -> Self { Self { skip: 0, limit: DEFAULT_LIMIT } }
}

#[cfg(test)]
mod tests {
    use super::PageQuery;

    #[test]
    fn normalize_clamps_zero_limit() {
        let (skip, limit) = PageQuery::new(0, 0).normalize();
        assert_eq!(skip, 0);
        assert_eq!(limit, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (skip, limit) = PageQuery::new(40, 1000).normalize();
        assert_eq!(skip, 40);
        assert_eq!(limit, 100);
    }

    #[test]
    fn normalize_clamps_skip_to_signed_range() {
        let (skip, _) = PageQuery::new(u64::MAX, 5).normalize();
        assert_eq!(skip, i64::MAX as u64);
    }

    #[test]
    fn default_values_are_sane() {
        let d = PageQuery::default();
        assert_eq!(d.skip, 0);
        assert_eq!(d.limit, 10);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let q: PageQuery = serde_json::from_str(r#"{"skip": 5}"#).unwrap();
        assert_eq!(q, PageQuery::new(5, 10));
    }
}
