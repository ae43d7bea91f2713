use std::{collections::BTreeMap, time::Duration};

use log::{debug, info};

use sculpture_shared::{
    Action, Diff, Disk, Game, LightArray, Schema, Status, StoreError, Tracked, TrackedStore,
    Value,
};

use crate::{
    animation::{AnimationId, PanelAnimation},
    config::SculptureConfig,
    dispatch::{Scheduler, TimerKey},
    logic,
};

pub const STATUS: &str = "status";
pub const PANEL_ANIMATION: &str = "panelAnimation";
pub const CURRENT_GAME: &str = "currentGame";
pub const HANDSHAKES: &str = "handshakes";
pub const LIGHTS: &str = "lights";
pub const DISKS: &str = "disks";

pub const DISK_IDS: [&str; 3] = ["disk0", "disk1", "disk2"];

/// The complete tracked state of one sculpture.
///
/// Scalars, the handshake set and each game's progress live in one
/// restricted store; the light array and the disks are tracked on their own
/// and folded in under `lights` and `disks` when a diff is taken.
pub struct SculptureState {
    data: TrackedStore,
    lights: LightArray,
    disks: BTreeMap<String, Disk>,
    animation: Option<PanelAnimation>,
    next_animation_id: AnimationId,
}

impl SculptureState {
    pub fn new(config: &SculptureConfig) -> Self {
        let mut schema = Schema::new()
            .value(STATUS, Status::Ready)
            .value(PANEL_ANIMATION, Value::Null)
            .value(CURRENT_GAME, Value::Null)
            .store(HANDSHAKES, TrackedStore::unrestricted());
        for game in Game::ALL {
            schema = schema.store(game.as_str(), TrackedStore::new(logic::tracked_properties(game)));
        }

        let lights = LightArray::new(
            config
                .lights
                .strip_lengths
                .iter()
                .map(|(strip_id, length)| (strip_id.as_str(), *length)),
            config.lights.default_intensity,
            &config.lights.default_color,
        );

        let disks = DISK_IDS
            .iter()
            .map(|disk_id| (disk_id.to_string(), Disk::new()))
            .collect();

        Self {
            data: TrackedStore::new(schema),
            lights,
            disks,
            animation: None,
            next_animation_id: 0,
        }
    }

    pub fn data(&self) -> &TrackedStore {
        &self.data
    }

    // Status

    pub fn status(&self) -> Result<Status, StoreError> {
        self.data.get_as(STATUS)
    }

    pub fn set_status(&mut self, status: Status) -> Result<(), StoreError> {
        self.data.set(STATUS, status)
    }

    pub fn is_ready(&self) -> Result<bool, StoreError> {
        Ok(self.status()? == Status::Ready)
    }

    pub fn is_locked(&self) -> Result<bool, StoreError> {
        Ok(self.status()? == Status::Locked)
    }

    /// Whether the status was written during the current cycle
    pub fn status_changed(&self) -> bool {
        self.data.is_changed(STATUS)
    }

    // Games

    pub fn current_game(&self) -> Result<Option<Game>, StoreError> {
        self.data.get_as(CURRENT_GAME)
    }

    pub fn set_current_game(&mut self, game: Game) -> Result<(), StoreError> {
        self.data.set(CURRENT_GAME, game)
    }

    /// The tracked progress of `game`
    pub fn game_data(&self, game: Game) -> Result<&TrackedStore, StoreError> {
        self.data.get_store(game.as_str())
    }

    pub fn game_data_mut(&mut self, game: Game) -> Result<&mut TrackedStore, StoreError> {
        self.data.get_store_mut(game.as_str())
    }

    // Handshakes

    pub fn handshakes(&self) -> Result<&TrackedStore, StoreError> {
        self.data.get_store(HANDSHAKES)
    }

    /// Users currently holding a handshake
    pub fn active_handshakes(&self) -> Result<Vec<&str>, StoreError> {
        let handshakes = self.handshakes()?;
        Ok(handshakes
            .names()
            .filter(|user| matches!(handshakes.get(user), Ok(Value::Bool(true))))
            .collect())
    }

    pub fn set_handshake(&mut self, user: &str, active: bool) -> Result<(), StoreError> {
        self.data.get_store_mut(HANDSHAKES)?.set(user, active)
    }

    // Actuators

    pub fn lights(&self) -> &LightArray {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightArray {
        &mut self.lights
    }

    pub fn disk(&self, disk_id: &str) -> Result<&Disk, StoreError> {
        self.disks.get(disk_id).ok_or_else(|| StoreError::UnknownDisk {
            disk_id: disk_id.to_string(),
        })
    }

    pub fn disk_mut(&mut self, disk_id: &str) -> Result<&mut Disk, StoreError> {
        self.disks
            .get_mut(disk_id)
            .ok_or_else(|| StoreError::UnknownDisk {
                disk_id: disk_id.to_string(),
            })
    }

    pub fn disk_ids(&self) -> impl Iterator<Item = &str> {
        self.disks.keys().map(String::as_str)
    }

    pub fn disks_mut(&mut self) -> impl Iterator<Item = &mut Disk> {
        self.disks.values_mut()
    }

    // Animations

    pub fn animation(&self) -> Option<&PanelAnimation> {
        self.animation.as_ref()
    }

    pub fn is_animation_running(&self) -> bool {
        self.animation
            .as_ref()
            .map(PanelAnimation::is_running)
            .unwrap_or(false)
    }

    /// Start `animation`, stopping whichever animation is still running
    pub fn play_animation(
        &mut self,
        mut animation: PanelAnimation,
        scheduler: &mut Scheduler,
    ) -> Result<AnimationId, StoreError> {
        if let Some(current) = self.animation.as_mut() {
            if current.is_running() {
                info!(
                    "Stopping animation '{}' to play '{}'",
                    current.name(),
                    animation.name()
                );
                current.stop();
            }
        }

        let id = self.next_animation_id;
        self.next_animation_id = self.next_animation_id.wrapping_add(1);

        animation.start(id);
        self.data.set(PANEL_ANIMATION, animation.name())?;
        scheduler.schedule(
            TimerKey::AnimationFrame,
            animation.delay_before(0),
            Action::AnimationFrame {
                animation: id,
                frame: 0,
            },
        );
        self.animation = Some(animation);

        Ok(id)
    }

    /// Stop the running animation without dispatching its completion action
    pub fn stop_animation(&mut self, scheduler: &mut Scheduler) -> Result<(), StoreError> {
        let Some(animation) = self.animation.as_mut() else {
            return Ok(());
        };
        if animation.is_stopped() {
            return Ok(());
        }

        animation.stop();
        scheduler.cancel(&TimerKey::AnimationFrame);
        self.data.set(PANEL_ANIMATION, Value::Null)
    }

    /// Run one frame of the animation `id`. Frames of replaced or stopped
    /// animations are ignored. Past the last frame, the animation is
    /// finished and its completion action is scheduled.
    pub(crate) fn run_animation_frame(
        &mut self,
        id: AnimationId,
        frame: usize,
        scheduler: &mut Scheduler,
    ) -> Result<(), StoreError> {
        let Some(animation) = self.animation.as_mut() else {
            return Ok(());
        };
        if animation.id() != Some(id) || animation.is_stopped() || animation.next_frame() != frame
        {
            debug!("Ignoring stale frame {} of animation {}", frame, id);
            return Ok(());
        }

        if let Some(current) = animation.frame(frame) {
            current.run(&mut self.lights)?;
            animation.advance();
            scheduler.schedule(
                TimerKey::AnimationFrame,
                animation.delay_before(frame + 1),
                Action::AnimationFrame {
                    animation: id,
                    frame: frame + 1,
                },
            );
            return Ok(());
        }

        animation.stop();
        let on_complete = animation.take_on_complete();
        self.data.set(PANEL_ANIMATION, Value::Null)?;
        if let Some(action) = on_complete {
            scheduler.schedule(TimerKey::AnimationComplete, Duration::ZERO, action);
        }
        Ok(())
    }

    fn disk_diffs(&self, old_values: bool) -> Diff {
        let mut diffs = Diff::new();
        for (disk_id, disk) in &self.disks {
            if !disk.has_changes() {
                continue;
            }
            let diff = if old_values {
                disk.changed_old_values()
            } else {
                disk.changed_current_values()
            };
            diffs.insert(disk_id.clone(), Value::Object(diff));
        }
        diffs
    }

    fn collect_changes(&self, old_values: bool) -> Diff {
        let mut diff = if old_values {
            self.data.changed_old_values()
        } else {
            self.data.changed_current_values()
        };

        if self.lights.has_changes() {
            let lights = if old_values {
                self.lights.changed_old_values()
            } else {
                self.lights.changed_current_values()
            };
            diff.insert(LIGHTS.to_string(), Value::Object(lights));
        }

        let disks = self.disk_diffs(old_values);
        if !disks.is_empty() {
            diff.insert(DISKS.to_string(), Value::Object(disks));
        }

        diff
    }
}

impl Tracked for SculptureState {
    fn has_changes(&self) -> bool {
        self.data.has_changes()
            || self.lights.has_changes()
            || self.disks.values().any(Disk::has_changes)
    }

    fn changed_current_values(&self) -> Diff {
        self.collect_changes(false)
    }

    fn changed_old_values(&self) -> Diff {
        self.collect_changes(true)
    }

    fn clear_changes(&mut self) {
        self.data.clear_changes();
        self.lights.clear_changes();
        for disk in self.disks.values_mut() {
            disk.clear_changes();
        }
    }
}
