//! Auth types
//!
//! Token claims and the resolved caller identity.

use crate::types::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of token carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token accepted by write endpoints
    #[default]
    Access,
    /// Long-lived token only good for minting access tokens
    Refresh,
}

/// JWT claims issued and accepted by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string
    pub sub: String,
    /// Token kind
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Build claims valid for `lifetime_seconds` from now
    pub fn new(user_id: RecordId, token_type: TokenType, lifetime_seconds: u64) -> Self {
        let now = Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let exp = now + lifetime_seconds as i64;
        Self {
            sub: user_id.to_string(),
            token_type,
            iat: now,
            exp,
        }
    }

    /// Expiration as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// The authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Id of the calling user
    pub user_id: RecordId,
}
