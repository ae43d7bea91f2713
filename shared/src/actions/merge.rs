use serde::{Deserialize, Serialize};

use crate::store::tracked_store::Diff;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeMetadata {
    /// Username of the sculpture that published the changes
    pub from: String,
}

/// Body of a `merge-state` action: a peer's published diff, keyed by
/// top-level property name, plus the identity of the sender.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergePayload {
    pub metadata: MergeMetadata,
    #[serde(flatten)]
    pub changes: Diff,
}

impl MergePayload {
    pub fn new(from: impl Into<String>, changes: Diff) -> Self {
        Self {
            metadata: MergeMetadata { from: from.into() },
            changes,
        }
    }

    pub fn is_from(&self, username: &str) -> bool {
        self.metadata.from == username
    }
}
