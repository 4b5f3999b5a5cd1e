//! Query normalization
//!
//! Turns a flat list of query pairs into a `PaginationRequest`. Parsing is
//! permissive: bad or missing values fall back to defaults, never errors.

use super::types::{
    PaginationRequest, SortDirection, LESS_THAN_KEY, MORE_THAN_KEY, ORDER_KEY, PAGE_KEY, TAKE_KEY,
};
use crate::config::DEFAULT_TAKE;
use crate::types::RecordId;

/// Builds pagination requests from raw query parameters
#[derive(Debug, Clone, Copy)]
pub struct QueryNormalizer {
    default_take: u64,
}

impl Default for QueryNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TAKE)
    }
}

impl QueryNormalizer {
    /// Create a normalizer with the given default page size
    pub fn new(default_take: u64) -> Self {
        Self {
            default_take: default_take.max(1),
        }
    }

    /// Default page size applied when `take` is absent or invalid
    pub fn default_take(&self) -> u64 {
        self.default_take
    }

    /// Normalize raw pairs; the first occurrence of a recognized key wins
    pub fn normalize<I, K, V>(&self, pairs: I) -> PaginationRequest
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let first = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let take = first(TAKE_KEY)
            .and_then(parse_positive)
            .unwrap_or(self.default_take);
        let order = first(ORDER_KEY)
            .and_then(SortDirection::parse)
            .unwrap_or_default();
        let page = first(PAGE_KEY).and_then(parse_positive);
        let less_than = first(LESS_THAN_KEY).and_then(parse_id);
        let more_than = first(MORE_THAN_KEY).and_then(parse_id);

        tracing::debug!(
            take,
            order = %order,
            ?page,
            ?less_than,
            ?more_than,
            "normalized pagination query"
        );

        PaginationRequest {
            take,
            order,
            page,
            less_than,
            more_than,
            params,
        }
    }
}

impl PaginationRequest {
    /// Normalize raw pairs with the default page size
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        QueryNormalizer::default().normalize(pairs)
    }
}

/// Parse a strictly positive integer
fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Parse a record id
fn parse_id(value: &str) -> Option<RecordId> {
    value.trim().parse::<RecordId>().ok()
}
