//! Next-link synthesis
//!
//! Builds the absolute URL of the page following a cursor page.

use super::types::PaginationRequest;
use crate::config::{ConfigProvider, HOST_KEY, PROTOCOL_KEY};
use crate::error::Result;
use crate::types::RecordId;
use url::Url;

/// Builds next-page URLs for one collection
#[derive(Debug, Clone)]
pub struct NextLinkBuilder {
    base: Url,
}

impl NextLinkBuilder {
    /// Create a builder for `protocol://host/collection`
    pub fn new(protocol: &str, host: &str, collection: &str) -> Result<Self> {
        let collection = collection.trim_matches('/');
        let base = Url::parse(&format!("{protocol}://{host}/{collection}"))?;
        Ok(Self { base })
    }

    /// Create a builder from the `protocol` and `host` config values
    pub fn from_config(config: &dyn ConfigProvider, collection: &str) -> Result<Self> {
        let protocol = config.require(PROTOCOL_KEY)?;
        let host = config.require(HOST_KEY)?;
        Self::new(&protocol, &host, collection)
    }

    /// Collection URL without query
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of the page after `last_id`
    ///
    /// Echoes the request's parameters (minus both cursor keys) and appends
    /// the cursor key matching the sort direction.
    pub fn next_url(&self, request: &PaginationRequest, last_id: RecordId) -> String {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in request.echo_params() {
                query.append_pair(&key, &value);
            }
            query.append_pair(request.order.next_cursor_key(), &last_id.to_string());
        }
        url.to_string()
    }
}
