use serde::{Deserialize, Serialize};

use crate::{
    actions::merge::MergePayload,
    store::tracked_store::Diff,
    types::{Direction, DiskState, Game},
};

/// Guard carried by timer-scheduled Simon replays. The replay only runs if
/// the game is still on `level` and its input state still matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayGuard {
    pub level: usize,
    pub after_input: bool,
}

/// Partial update reported by a disk controller. Missing fields are left
/// untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<DiskState>,
}

impl DiskUpdate {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.direction.is_none()
            && self.user.is_none()
            && self.state.is_none()
    }
}

/// Every action the dispatcher carries, tagged by `actionType` on the wire
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "actionType", rename_all = "kebab-case")]
pub enum Action {
    StartGame {
        game: Game,
    },
    StartNextGame,
    MergeState(MergePayload),
    RestoreStatus,
    AnimationFrame {
        animation: u64,
        frame: usize,
    },
    FinishStatusAnimation,
    HandshakeActivate {
        user: String,
    },
    HandshakeDeactivate {
        user: String,
    },
    #[serde(rename_all = "camelCase")]
    PanelPressed {
        strip_id: String,
        panel_id: String,
        pressed: bool,
    },
    DiskUpdate(DiskUpdate),
    MoleAvailPanel,
    #[serde(rename_all = "camelCase")]
    MoleMovePanel {
        strip_id: String,
        panel_id: String,
    },
    ReplaySimonPattern {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        guard: Option<ReplayGuard>,
    },
    SimonSequenceFinished {
        level: usize,
    },
}

impl Action {
    pub fn start_game(game: Game) -> Self {
        Action::StartGame { game }
    }

    pub fn merge_state(from: impl Into<String>, changes: Diff) -> Self {
        Action::MergeState(MergePayload::new(from, changes))
    }

    pub fn handshake_activate(user: impl Into<String>) -> Self {
        Action::HandshakeActivate { user: user.into() }
    }

    pub fn handshake_deactivate(user: impl Into<String>) -> Self {
        Action::HandshakeDeactivate { user: user.into() }
    }

    pub fn panel_pressed(
        strip_id: impl Into<String>,
        panel_id: impl Into<String>,
        pressed: bool,
    ) -> Self {
        Action::PanelPressed {
            strip_id: strip_id.into(),
            panel_id: panel_id.into(),
            pressed,
        }
    }

    /// Returns `None` when the update carries nothing to apply
    pub fn disk_update(disk_id: impl Into<String>, update: DiskUpdate) -> Option<Self> {
        if update.is_empty() {
            return None;
        }
        Some(Action::DiskUpdate(DiskUpdate {
            disk_id: Some(disk_id.into()),
            ..update
        }))
    }

    pub fn mole_move_panel(strip_id: impl Into<String>, panel_id: impl Into<String>) -> Self {
        Action::MoleMovePanel {
            strip_id: strip_id.into(),
            panel_id: panel_id.into(),
        }
    }

    /// The wire name of this action
    pub fn action_type(&self) -> &'static str {
        match self {
            Action::StartGame { .. } => "start-game",
            Action::StartNextGame => "start-next-game",
            Action::MergeState(_) => "merge-state",
            Action::RestoreStatus => "restore-status",
            Action::AnimationFrame { .. } => "animation-frame",
            Action::FinishStatusAnimation => "finish-status-animation",
            Action::HandshakeActivate { .. } => "handshake-activate",
            Action::HandshakeDeactivate { .. } => "handshake-deactivate",
            Action::PanelPressed { .. } => "panel-pressed",
            Action::DiskUpdate(_) => "disk-update",
            Action::MoleAvailPanel => "mole-avail-panel",
            Action::MoleMovePanel { .. } => "mole-move-panel",
            Action::ReplaySimonPattern { .. } => "replay-simon-pattern",
            Action::SimonSequenceFinished { .. } => "simon-sequence-finished",
        }
    }

    /// Whether this action is still handled while the sculpture is locked
    pub fn runs_when_locked(&self) -> bool {
        matches!(self, Action::MergeState(_))
    }
}
