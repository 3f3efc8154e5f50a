//! Best-effort structural validation of persisted documents

use apidocs_document::{DocumentSummary, OpenApiDocument};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a structural check. A failed check is recorded, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid(DocumentSummary),
    Invalid { warning: String },
}

impl ValidationOutcome {
    /// Check document text
    pub fn check_text(content: &str) -> Self {
        match OpenApiDocument::from_text(content) {
            Ok(document) => Self::Valid(document.summary()),
            Err(e) => Self::Invalid {
                warning: e.to_string(),
            },
        }
    }

    /// Re-read and check a persisted document
    pub async fn check_file(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::check_text(&content),
            Err(e) => Self::Invalid {
                warning: format!("failed to read {}: {}", path.display(), e),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid { warning } => Some(warning),
        }
    }
}
