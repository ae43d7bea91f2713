//! # Sculpture Shared
//! Change-tracked state model shared by every sculpture: tracked stores,
//! actuator models and the action catalog carried by the dispatcher.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod actions;
mod actuators;
mod store;
mod types;

pub use actions::{
    action::{Action, DiskUpdate, ReplayGuard},
    merge::{MergeMetadata, MergePayload},
};
pub use actuators::{
    disk::{self as disk_properties, Disk},
    light_array::{self as light_properties, LightArray, DEFAULT_MAX_INTENSITY},
};
pub use store::{
    error::StoreError,
    schema::Schema,
    tracked::Tracked,
    tracked_store::{Diff, Property, TrackedStore},
};
pub use types::{Direction, DiskState, Game, PanelRef, ParseVariantError, Status};

pub use serde_json::Value;
