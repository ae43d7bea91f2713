use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sculpture-wide lifecycle flag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ready,
    Locked,
    Success,
    Failure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Handshake,
    Mole,
    Disk,
    Simon,
}

/// Rotation a disk is being pulled in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Stopped,
    Clockwise,
    Counterclockwise,
    /// Pulled both ways at once
    Conflict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskState {
    Homing,
    Ready,
}

/// Address of a single light panel
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRef {
    pub strip_id: String,
    pub panel_id: String,
}

impl PanelRef {
    pub fn new(strip_id: impl Into<String>, panel_id: impl Into<String>) -> Self {
        Self {
            strip_id: strip_id.into(),
            panel_id: panel_id.into(),
        }
    }
}

impl fmt::Display for PanelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.strip_id, self.panel_id)
    }
}

/// Returned when a string names none of the variants of a sculpture enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseVariantError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(ParseVariantError {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::String(value.as_str().to_string())
            }
        }
    };
}

string_enum!(Status, "status", {
    Ready => "ready",
    Locked => "locked",
    Success => "success",
    Failure => "failure",
});

string_enum!(Game, "game", {
    Handshake => "handshake",
    Mole => "mole",
    Disk => "disk",
    Simon => "simon",
});

string_enum!(Direction, "direction", {
    Stopped => "stopped",
    Clockwise => "clockwise",
    Counterclockwise => "counterclockwise",
    Conflict => "conflict",
});

string_enum!(DiskState, "disk state", {
    Homing => "homing",
    Ready => "ready",
});

impl Game {
    pub const ALL: [Game; 4] = [Game::Handshake, Game::Mole, Game::Disk, Game::Simon];
}
