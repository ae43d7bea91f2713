//! Applying peer change-sets.
//!
//! A peer's published diff is translated key by key into the same
//! operations a local action would perform, so merged values are tracked,
//! re-published and arbitrated exactly like local ones. There is no version
//! vector: the last diff applied wins.

use log::{debug, warn};

use sculpture_shared::{
    disk_properties, light_properties, Diff, DiskState, Game, MergePayload, Status, StoreError,
    Value,
};

use crate::{
    dispatch::Scheduler,
    error::SculptureError,
    state::{CURRENT_GAME, DISKS, HANDSHAKES, LIGHTS, STATUS},
    store::sculpture_store::SculptureStore,
};

impl SculptureStore {
    pub(crate) fn merge_state(
        &mut self,
        payload: &MergePayload,
        scheduler: &mut Scheduler,
    ) -> Result<(), SculptureError> {
        if payload.is_from(self.username()) {
            debug!("Ignoring our own change-set");
            return Ok(());
        }

        let sender = payload.metadata.from.as_str();
        for (name, changes) in &payload.changes {
            match name.as_str() {
                STATUS => self.merge_status(changes)?,
                CURRENT_GAME => self.merge_current_game(changes, scheduler)?,
                HANDSHAKES => self.merge_handshakes(changes)?,
                LIGHTS => self.merge_lights(changes, sender)?,
                DISKS => self.merge_disks(changes)?,
                other => match other.parse::<Game>() {
                    Ok(game) => self.merge_game_data(game, changes)?,
                    Err(_) => warn!("No merge strategy for property '{}' from {}", other, sender),
                },
            }
        }
        Ok(())
    }

    fn merge_status(&mut self, changes: &Value) -> Result<(), SculptureError> {
        let status: Status = serde_json::from_value(changes.clone())
            .map_err(|_| unexpected_type(STATUS, "status"))?;
        self.state_mut().set_status(status)?;
        Ok(())
    }

    fn merge_current_game(
        &mut self,
        changes: &Value,
        scheduler: &mut Scheduler,
    ) -> Result<(), SculptureError> {
        let Some(name) = changes.as_str() else {
            return Ok(());
        };
        let game = name
            .parse::<Game>()
            .map_err(|_| SculptureError::UnrecognizedGame {
                game: name.to_string(),
            })?;

        if self.current_game() != Some(game) {
            self.start_game(game, scheduler)?;
        }
        Ok(())
    }

    fn merge_handshakes(&mut self, changes: &Value) -> Result<(), SculptureError> {
        for (user, active) in as_object(HANDSHAKES, changes)? {
            let active = active.as_bool().unwrap_or(false);
            self.state_mut().set_handshake(user, active)?;
        }
        Ok(())
    }

    fn merge_lights(&mut self, changes: &Value, sender: &str) -> Result<(), SculptureError> {
        let sender_color = self.config().user_color(sender).map(str::to_string);
        let lights = self.state_mut().lights_mut();

        for (strip_id, strip_changes) in as_object(LIGHTS, changes)? {
            let strip_changes = as_object(strip_id, strip_changes)?;

            if let Some(max_intensity) = strip_changes.get(light_properties::MAX_INTENSITY) {
                let max_intensity = as_u32(light_properties::MAX_INTENSITY, max_intensity)?;
                lights.set_max_intensity(max_intensity, Some(strip_id))?;
            }

            let Some(panels) = strip_changes.get(light_properties::PANELS) else {
                continue;
            };
            for (panel_id, panel_changes) in as_object(light_properties::PANELS, panels)? {
                let panel_changes = as_object(panel_id, panel_changes)?;

                if let Some(intensity) = panel_changes.get(light_properties::INTENSITY) {
                    let intensity = as_u32(light_properties::INTENSITY, intensity)?;
                    lights.set_intensity(strip_id, Some(panel_id), intensity)?;
                }
                if let Some(color) = panel_changes.get(light_properties::COLOR) {
                    let color = color
                        .as_str()
                        .ok_or_else(|| unexpected_type(light_properties::COLOR, "string"))?;
                    lights.set_color(strip_id, Some(panel_id), color)?;
                }
                if let Some(active) = panel_changes.get(light_properties::ACTIVE) {
                    let active = active
                        .as_bool()
                        .ok_or_else(|| unexpected_type(light_properties::ACTIVE, "bool"))?;
                    lights.activate(strip_id, panel_id, active)?;
                    match &sender_color {
                        Some(color) => lights.set_color(strip_id, Some(panel_id), color)?,
                        None => warn!("Unknown color for user {}", sender),
                    }
                }
            }
        }
        Ok(())
    }

    fn merge_disks(&mut self, changes: &Value) -> Result<(), SculptureError> {
        for (disk_id, disk_changes) in as_object(DISKS, changes)? {
            let disk_changes = as_object(disk_id, disk_changes)?;
            let disk = self.state_mut().disk_mut(disk_id)?;

            if let Some(position) = disk_changes.get(disk_properties::POSITION) {
                let position = position
                    .as_f64()
                    .ok_or_else(|| unexpected_type(disk_properties::POSITION, "number"))?;
                disk.rotate_to(position)?;
            }
            if let Some(user) = disk_changes.get(disk_properties::USER) {
                disk.set_user(user.as_str().unwrap_or_default())?;
            }
            if let Some(state) = disk_changes.get(disk_properties::STATE) {
                let state: DiskState = serde_json::from_value(state.clone())
                    .map_err(|_| unexpected_type(disk_properties::STATE, "disk state"))?;
                disk.set_state(state)?;
            }

            let clockwise = disk_changes.get(disk_properties::CLOCKWISE_PULL);
            let counterclockwise = disk_changes.get(disk_properties::COUNTERCLOCKWISE_PULL);
            if clockwise.is_some() || counterclockwise.is_some() {
                let clockwise = match clockwise {
                    Some(pull) => as_u32(disk_properties::CLOCKWISE_PULL, pull)?,
                    None => disk.clockwise_pull()?,
                };
                let counterclockwise = match counterclockwise {
                    Some(pull) => as_u32(disk_properties::COUNTERCLOCKWISE_PULL, pull)?,
                    None => disk.counterclockwise_pull()?,
                };
                // the direction is re-arbitrated locally from the merged pulls
                disk.set_pulls(clockwise, counterclockwise)?;
            }
        }
        Ok(())
    }

    fn merge_game_data(&mut self, game: Game, changes: &Value) -> Result<(), SculptureError> {
        let changes = as_object(game.as_str(), changes)?;
        self.state_mut().game_data_mut(game)?.merge(changes)?;
        Ok(())
    }
}

fn as_object<'v>(name: &str, value: &'v Value) -> Result<&'v Diff, StoreError> {
    value
        .as_object()
        .ok_or_else(|| unexpected_type(name, "object"))
}

fn as_u32(name: &str, value: &Value) -> Result<u32, StoreError> {
    value
        .as_u64()
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| unexpected_type(name, "u32"))
}

fn unexpected_type(name: &str, expected: &'static str) -> StoreError {
    StoreError::UnexpectedType {
        name: name.to_string(),
        expected,
    }
}
