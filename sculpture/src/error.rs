use thiserror::Error;

use sculpture_shared::StoreError;

/// Errors raised while a sculpture handles an action
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SculptureError {
    /// A tracked-state read or write failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A start or merge named a game this sculpture does not know
    #[error("Unrecognized game: '{game}'")]
    UnrecognizedGame { game: String },

    /// State was mutated outside of an action-handling cycle
    #[error("Sculpture state was mutated outside of an action: {changed}")]
    OutOfCycleMutation { changed: String },

    /// Dispatched an action before any handler was registered
    #[error("No action handler is registered with the dispatcher")]
    NoHandlerRegistered,

    /// Registered a second handler with a dispatcher that already has one
    #[error("The dispatcher already has a registered action handler")]
    HandlerAlreadyRegistered,

    /// A game's tracked level is outside of its configured levels
    #[error("{game} game has no level {level}")]
    InvalidLevel { game: &'static str, level: usize },
}
