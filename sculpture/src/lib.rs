//! # Sculpture
//! A serialized action-handling store that runs the interactive sculpture
//! games, plays panel animations, and merges the change-sets published by
//! peer sculptures so that every installation converges on the same state.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use sculpture_shared::{
        disk_properties, light_properties, Action, Diff, Direction, Disk, DiskState, DiskUpdate,
        Game, LightArray, MergeMetadata, MergePayload, PanelRef, ReplayGuard, Schema, Status,
        StoreError, Tracked, TrackedStore, Value,
    };
}

mod animation;
mod config;
mod dispatch;
mod error;
mod logic;
mod state;
mod store;

pub use animation::{
    status_animation, AnimationId, Frame, FrameEffect, PanelAnimation, DEFAULT_FRAME_DELAY,
};
pub use config::{
    ColorsConfig, ControlMapping, DiskGameConfig, DiskLevel, HandshakeGameConfig,
    LifetimeBreakpoint, LightsConfig, MoleGameConfig, PanelDefaults, SculptureConfig,
    SimonGameConfig, SimonLevel, StatusAnimationConfig, ART_LIGHTS_STRIP, DISK_LIGHT_STRIP,
    HANDSHAKE_STRIP, PERIMETER_STRIP, STRIP_A, STRIP_B, STRIP_C,
};
pub use dispatch::{ActionHandler, DispatchToken, Dispatcher, Scheduler, TimerKey};
pub use error::SculptureError;
pub use logic::{
    shortest_arc, ActiveGame, DiskGame, GameContext, GameLogic, HandshakeGame, MoleGame,
    MolePanelState, SimonGame,
};
pub use state::{
    SculptureState, CURRENT_GAME, DISKS, DISK_IDS, HANDSHAKES, LIGHTS, PANEL_ANIMATION, STATUS,
};
pub use store::{ChangeEvent, SculptureStore};
