// Time-series provider: the external collaborator the reducers query.
// Authorization is the caller's job; a client is built per request from an
// immutable credential snapshot and shared read-only across concurrent reducers.

mod google_fit;
pub mod response;

pub use google_fit::{DEFAULT_BASE_URL, GoogleFitClient, GoogleFitFactory};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::models::RawPoint;
use crate::window::TimeWindow;

/// Activity type code the provider uses for sleep sessions.
pub const SLEEP_ACTIVITY_TYPE: i64 = 72;

#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Points of one data source inside `window`.
    async fn fetch_points(
        &self,
        source_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RawPoint>, ProviderError>;

    /// Sessions overlapping `window` with the given activity type, one point per
    /// session spanning its start/end with the activity type as its value.
    async fn fetch_sessions(
        &self,
        window: &TimeWindow,
        activity_type: i64,
    ) -> Result<Vec<RawPoint>, ProviderError>;
}

/// Builds an authorized client for one request.
pub trait ProviderFactory: Send + Sync {
    fn client(&self, credentials: Credentials) -> Arc<dyn ProviderClient>;
}

/// Already-authorized access token. Never mutated once handed to a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
}

impl Credentials {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
