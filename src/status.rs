//! Status reported back for a registration attempt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::registry::RegistrationRecord;
use crate::RegistryError;

/// Delay before re-registering a published document
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Delay before retrying a failed registration
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Pending,
    Available,
    Failed,
}

/// Externally visible state of one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecStatus {
    pub status: Phase,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SpecStatus {
    pub fn pending() -> Self {
        Self {
            status: Phase::Pending,
            url: None,
            last_updated: None,
            error_message: None,
        }
    }

    /// Status for the result of a registration
    pub fn from_outcome(outcome: Result<&RegistrationRecord, &RegistryError>) -> Self {
        match outcome {
            Ok(record) => Self {
                status: Phase::Available,
                url: Some(record.docs_url.clone()),
                last_updated: Some(record.published_at),
                error_message: None,
            },
            Err(e) => Self {
                status: Phase::Failed,
                url: None,
                last_updated: Some(Utc::now()),
                error_message: Some(e.to_string()),
            },
        }
    }

    /// How long to wait before the next registration attempt.
    /// Pending resources are processed immediately.
    pub fn requeue_after(&self) -> Duration {
        match self.status {
            Phase::Pending => Duration::ZERO,
            Phase::Available => REFRESH_INTERVAL,
            Phase::Failed => RETRY_INTERVAL,
        }
    }
}
