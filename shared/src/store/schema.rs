use serde_json::Value;

use crate::store::tracked_store::{Property, TrackedStore};

/// Ordered declaration of the properties a restricted `TrackedStore` accepts,
/// each with its default value or nested store.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    entries: Vec<(String, Property)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a leaf property
    pub fn value(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.entries
            .push((name.into(), Property::Value(default.into())));
        self
    }

    /// Declare a nested store property
    pub fn store(mut self, name: impl Into<String>, store: TrackedStore) -> Self {
        self.entries.push((name.into(), Property::Store(store)));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Property)> {
        self.entries
    }
}
