use thiserror::Error;

/// Errors that can occur while reading or mutating tracked state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Attempted to read or write a name that the store's schema does not declare
    #[error("Cannot access undeclared property '{name}'")]
    InvalidProperty { name: String },

    /// Attempted to read or assign a nested store as if it were a plain value
    #[error("Property '{name}' holds a nested store and cannot be used as a value")]
    NotAValue { name: String },

    /// Attempted to descend into a property that holds a plain value
    #[error("Property '{name}' does not hold a nested store")]
    NotAStore { name: String },

    /// A property held a value of the wrong shape for the requested read
    #[error("Property '{name}' should hold a {expected}")]
    UnexpectedType {
        name: String,
        expected: &'static str,
    },

    /// Referenced a strip the light array was not built with
    #[error("Light array has no strip '{strip_id}'")]
    UnknownStrip { strip_id: String },

    /// Referenced a panel outside of its strip
    #[error("Strip '{strip_id}' has no panel '{panel_id}'")]
    UnknownPanel { strip_id: String, panel_id: String },

    /// Referenced a disk the sculpture does not have
    #[error("Sculpture has no disk '{disk_id}'")]
    UnknownDisk { disk_id: String },
}
