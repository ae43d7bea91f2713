//! Configuration of a single sculpture.
//!
//! Every value here has a sensible default matching the physical
//! installation: three sculptures, each with three game strips, a disk
//! perimeter, disk lights, a handshake strip and art lights. Construct with
//! [`SculptureConfig::for_user`] and override fields as needed.

mod games;

pub use games::{
    ControlMapping, DiskGameConfig, DiskLevel, HandshakeGameConfig, LifetimeBreakpoint,
    MoleGameConfig, SimonGameConfig, SimonLevel,
};

use std::{collections::HashMap, time::Duration};

use sculpture_shared::Game;

pub const STRIP_A: &str = "0";
pub const STRIP_B: &str = "1";
pub const STRIP_C: &str = "2";
pub const PERIMETER_STRIP: &str = "3";
pub const DISK_LIGHT_STRIP: &str = "4";
pub const HANDSHAKE_STRIP: &str = "5";
pub const ART_LIGHTS_STRIP: &str = "6";

/// Contains Config properties which will be used by a Sculpture
#[derive(Clone, Debug)]
pub struct SculptureConfig {
    /// Identity of this sculpture. Merges whose sender matches are ignored.
    pub username: String,
    /// Games cycled through by `start-next-game`, in order
    pub games_sequence: Vec<Game>,
    pub lights: LightsConfig,
    pub colors: ColorsConfig,
    pub panel_defaults: PanelDefaults,
    pub status_animation: StatusAnimationConfig,
    pub handshake_game: HandshakeGameConfig,
    pub mole_game: MoleGameConfig,
    pub disk_game: DiskGameConfig,
    pub simon_game: SimonGameConfig,
}

impl SculptureConfig {
    pub fn for_user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// The color a user's actions are shown in, if the user is known
    pub fn user_color(&self, user: &str) -> Option<&str> {
        self.colors.users.get(user).map(String::as_str)
    }

    /// This sculpture's own color, falling back to the default panel color
    pub fn own_color(&self) -> &str {
        self.user_color(&self.username)
            .unwrap_or(&self.lights.default_color)
    }
}

impl Default for SculptureConfig {
    fn default() -> Self {
        Self {
            username: "sculpture0".to_string(),
            games_sequence: vec![Game::Handshake, Game::Mole, Game::Disk, Game::Simon],
            lights: LightsConfig::default(),
            colors: ColorsConfig::default(),
            panel_defaults: PanelDefaults::default(),
            status_animation: StatusAnimationConfig::default(),
            handshake_game: HandshakeGameConfig::default(),
            mole_game: MoleGameConfig::default(),
            disk_game: DiskGameConfig::default(),
            simon_game: SimonGameConfig::default(),
        }
    }
}

/// Layout of the light array
#[derive(Clone, Debug)]
pub struct LightsConfig {
    /// Strip id and number of panels, in strip order
    pub strip_lengths: Vec<(String, usize)>,
    /// Strips shared by the games; reset whenever a game starts
    pub game_strips: Vec<String>,
    pub default_color: String,
    pub default_intensity: u32,
}

impl Default for LightsConfig {
    fn default() -> Self {
        let strip_lengths = [
            (STRIP_A, 10),
            (STRIP_B, 10),
            (STRIP_C, 10),
            (PERIMETER_STRIP, 6),
            (DISK_LIGHT_STRIP, 3),
            (HANDSHAKE_STRIP, 4),
            (ART_LIGHTS_STRIP, 3),
        ];

        Self {
            strip_lengths: strip_lengths
                .iter()
                .map(|(strip_id, length)| (strip_id.to_string(), *length))
                .collect(),
            game_strips: vec![STRIP_A.to_string(), STRIP_B.to_string(), STRIP_C.to_string()],
            default_color: "white".to_string(),
            default_intensity: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColorsConfig {
    /// Username -> color
    pub users: HashMap<String, String>,
    /// Color shown on failures and conflicts
    pub error: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        let users = [
            ("sculpture0", "user0"),
            ("sculpture1", "user1"),
            ("sculpture2", "user2"),
        ];

        Self {
            users: users
                .iter()
                .map(|(user, color)| (user.to_string(), color.to_string()))
                .collect(),
            error: "error".to_string(),
        }
    }
}

/// Intensities applied to game panels as they are pressed and released
#[derive(Clone, Debug)]
pub struct PanelDefaults {
    pub active_intensity: u32,
    pub inactive_intensity: u32,
}

impl Default for PanelDefaults {
    fn default() -> Self {
        Self {
            active_intensity: 100,
            inactive_intensity: 0,
        }
    }
}

/// Blink played when the status turns `success` or `failure`
#[derive(Clone, Debug)]
pub struct StatusAnimationConfig {
    pub strip_id: String,
    pub blinks: usize,
    pub frame_delay: Duration,
    pub intensity: u32,
}

impl Default for StatusAnimationConfig {
    fn default() -> Self {
        Self {
            strip_id: HANDSHAKE_STRIP.to_string(),
            blinks: 3,
            frame_delay: Duration::from_millis(250),
            intensity: 100,
        }
    }
}
