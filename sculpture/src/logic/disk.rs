use std::time::Duration;

use log::{debug, info};

use sculpture_shared::{Action, Direction, Game, Schema, Status, StoreError};

use crate::{
    config::{DiskGameConfig, DiskLevel, SculptureConfig},
    error::SculptureError,
    logic::{GameContext, GameLogic},
};

const LEVEL: &str = "level";

/// Align three rotating disks to each level's target positions using the
/// clockwise and counterclockwise control panels.
#[derive(Debug, Default)]
pub struct DiskGame {
    complete: bool,
}

impl DiskGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(ctx: &GameContext<'_>) -> Result<usize, StoreError> {
        ctx.state.game_data(Game::Disk)?.get_usize(LEVEL)
    }

    fn set_level(ctx: &mut GameContext<'_>, level: usize) -> Result<(), StoreError> {
        ctx.state.game_data_mut(Game::Disk)?.set(LEVEL, level)
    }

    fn current_level<'c>(&self, ctx: &GameContext<'c>) -> Result<&'c DiskLevel, SculptureError> {
        let level = Self::level(ctx)?;
        let config: &'c SculptureConfig = ctx.config;
        config
            .disk_game
            .levels
            .get(level)
            .ok_or(SculptureError::InvalidLevel { game: "disk", level })
    }

    /// Degrees `disk_id` is away from its target on the current level
    pub fn disk_score(&self, ctx: &GameContext<'_>, disk_id: &str) -> Result<f64, SculptureError> {
        // a complete game has no valid level
        if self.complete {
            return Ok(0.0);
        }

        let level = self.current_level(ctx)?;
        let Some((_, target)) = level.targets.iter().find(|(id, _)| id == disk_id) else {
            return Ok(0.0);
        };
        Ok(shortest_arc(ctx.state.disk(disk_id)?.position()?, *target))
    }

    /// Total degrees all disks are away from the current level's targets
    pub fn score(&self, ctx: &GameContext<'_>) -> Result<f64, SculptureError> {
        if self.complete {
            return Ok(0.0);
        }

        let mut distance = 0.0;
        for (disk_id, _) in &self.current_level(ctx)?.targets {
            distance += self.disk_score(ctx, disk_id)?;
        }
        Ok(distance)
    }

    /// A peer may finish the last level; its merged level is then past the end
    fn sync_completion(&mut self, ctx: &GameContext<'_>) -> Result<(), SculptureError> {
        if !self.complete && Self::level(ctx)? >= ctx.config.disk_game.levels.len() {
            info!("Disk game was completed by a peer");
            self.complete = true;
        }
        Ok(())
    }

    fn panel_pressed(
        &mut self,
        strip_id: &str,
        panel_id: &str,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        if self.complete {
            return Ok(());
        }

        let config = ctx.config;
        let game_config = &config.disk_game;
        let direction = if strip_id == game_config.clockwise_strip {
            Direction::Clockwise
        } else if strip_id == game_config.counterclockwise_strip {
            Direction::Counterclockwise
        } else {
            return Ok(());
        };

        let Some(mapping) = game_config.disk_for_panel(panel_id) else {
            // unmapped panels on a control strip stay dark
            ctx.state.lights_mut().set_intensity(strip_id, Some(panel_id), 0)?;
            return Ok(());
        };

        let lights = ctx.state.lights();
        let mut active_panels = 0;
        for panel in &mapping.panels {
            if lights.is_active(strip_id, panel)? {
                active_panels += 1;
            }
        }

        match active_panels {
            1 => self.activate_disk(&mapping.disk_id, direction, strip_id, &mapping.panels, ctx)?,
            0 => self.deactivate_disk(&mapping.disk_id, direction, strip_id, &mapping.panels, ctx)?,
            _ => {}
        }

        if ctx.state.disk(&mapping.disk_id)?.is_conflicting()? {
            set_disk_controls_color(ctx, &mapping.disk_id, &config.colors.error)?;
        }
        Ok(())
    }

    fn activate_disk(
        &mut self,
        disk_id: &str,
        direction: Direction,
        strip_id: &str,
        panel_ids: &[String],
        ctx: &mut GameContext<'_>,
    ) -> Result<(), StoreError> {
        ctx.state.disk_mut(disk_id)?.set_direction(direction)?;

        let intensity = ctx.config.disk_game.active_control_panel_intensity;
        let color = ctx.own_color().to_string();
        let lights = ctx.state.lights_mut();
        for panel_id in panel_ids {
            lights.set_intensity(strip_id, Some(panel_id), intensity)?;
            lights.set_color(strip_id, Some(panel_id), &color)?;
        }
        Ok(())
    }

    fn deactivate_disk(
        &mut self,
        disk_id: &str,
        direction: Direction,
        strip_id: &str,
        panel_ids: &[String],
        ctx: &mut GameContext<'_>,
    ) -> Result<(), StoreError> {
        // disks are stopped between levels, so a hand lifted after a win
        // must not release a pull that no longer exists
        let disk = ctx.state.disk_mut(disk_id)?;
        if !disk.is_stopped()? {
            disk.unset_direction(direction)?;
        }

        let intensity = ctx.config.disk_game.control_panel_intensity;
        let lights = ctx.state.lights_mut();
        for panel_id in panel_ids {
            lights.set_intensity(strip_id, Some(panel_id), intensity)?;
            lights.set_default_color(strip_id, Some(panel_id))?;
        }
        Ok(())
    }

    fn check_win_conditions(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        if self.complete {
            return Ok(());
        }

        let config = ctx.config;
        let level = self.current_level(ctx)?;
        if !is_solved(&config.disk_game, level, ctx)? {
            return Ok(());
        }

        self.win_level(ctx)
    }

    fn win_level(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        let config = ctx.config;
        let game_config = &config.disk_game;

        ctx.state.lights_mut().deactivate_all(None)?;
        for disk in ctx.state.disks_mut() {
            disk.stop()?;
        }
        ctx.state.set_status(Status::Success)?;

        let level = Self::level(ctx)?;
        let color = ctx.own_color().to_string();
        set_perimeter(ctx, level, &color, game_config.inactive_perimeter_intensity)?;

        let next_level = level + 1;
        if next_level >= game_config.levels.len() {
            self.complete = true;
        }
        Self::set_level(ctx, next_level)?;
        info!("Disk game level {} solved", level);

        if !self.complete {
            set_perimeter(
                ctx,
                next_level,
                &game_config.perimeter_color,
                game_config.active_perimeter_intensity,
            )?;
        }
        Ok(())
    }
}

impl GameLogic for DiskGame {
    fn tracked_properties() -> Schema {
        Schema::new().value(LEVEL, 0)
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        self.complete = false;
        Self::set_level(ctx, 0)?;

        let config = ctx.config;
        let game_config = &config.disk_game;
        let lights = ctx.state.lights_mut();
        for panel in &game_config.shadow_lights {
            lights.set_intensity(
                &panel.strip_id,
                Some(&panel.panel_id),
                game_config.shadow_light_intensity,
            )?;
        }

        set_perimeter(
            ctx,
            0,
            &game_config.perimeter_color,
            game_config.active_perimeter_intensity,
        )?;

        let lights = ctx.state.lights_mut();
        for mapping in &game_config.controls {
            for strip_id in [&game_config.clockwise_strip, &game_config.counterclockwise_strip] {
                for panel_id in &mapping.panels {
                    lights.set_intensity(
                        strip_id,
                        Some(panel_id),
                        game_config.control_panel_intensity,
                    )?;
                }
            }
        }
        Ok(())
    }

    fn end(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        let config = ctx.config;
        let game_config = &config.disk_game;
        let lights = ctx.state.lights_mut();

        for strip_id in &config.lights.game_strips {
            lights.set_intensity(strip_id, None, 0)?;
        }
        for panel in &game_config.shadow_lights {
            lights.set_intensity(&panel.strip_id, Some(&panel.panel_id), 0)?;
        }
        lights.set_intensity(&game_config.perimeter_strip, None, 0)?;
        lights.set_default_color(&game_config.perimeter_strip, None)?;
        Ok(())
    }

    fn handle_action(
        &mut self,
        action: &Action,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        self.sync_completion(ctx)?;
        match action {
            Action::PanelPressed {
                strip_id, panel_id, ..
            } => self.panel_pressed(strip_id, panel_id, ctx),
            Action::DiskUpdate(update) if update.disk_id.is_some() => {
                if ctx.state.status()? == Status::Success {
                    return Ok(());
                }
                self.check_win_conditions(ctx)
            }
            Action::FinishStatusAnimation if self.complete => {
                ctx.schedule_next_game(Duration::ZERO);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Absolute angular distance in degrees, never more than 180
pub fn shortest_arc(position: f64, target: f64) -> f64 {
    let distance = (position - target).abs() % 360.0;
    if distance > 180.0 {
        360.0 - distance
    } else {
        distance
    }
}

fn is_solved(
    config: &DiskGameConfig,
    level: &DiskLevel,
    ctx: &GameContext<'_>,
) -> Result<bool, SculptureError> {
    let mut previous: Option<(f64, f64)> = None;

    for (disk_id, target) in &level.targets {
        let position = ctx.state.disk(disk_id)?.position()?;

        if config.check_relative_tolerance {
            if let Some((previous_target, previous_position)) = previous {
                let offset = (target - previous_target) - (position - previous_position);
                if offset.abs() > config.relative_tolerance {
                    return Ok(false);
                }
            }
            previous = Some((*target, position));
        }

        let error = shortest_arc(position, *target);
        debug!("{} error: {}", disk_id, error);
        if error > config.absolute_tolerance {
            return Ok(false);
        }
    }

    Ok(true)
}

fn set_perimeter(
    ctx: &mut GameContext<'_>,
    level: usize,
    color: &str,
    intensity: u32,
) -> Result<(), SculptureError> {
    let config = ctx.config;
    let game_config = &config.disk_game;
    let perimeter = &game_config
        .levels
        .get(level)
        .ok_or(SculptureError::InvalidLevel { game: "disk", level })?
        .perimeter;

    let lights = ctx.state.lights_mut();
    for panel_id in perimeter {
        lights.set_color(&game_config.perimeter_strip, Some(panel_id), color)?;
        lights.set_intensity(&game_config.perimeter_strip, Some(panel_id), intensity)?;
    }
    Ok(())
}

fn set_disk_controls_color(
    ctx: &mut GameContext<'_>,
    disk_id: &str,
    color: &str,
) -> Result<(), StoreError> {
    let config = ctx.config;
    let game_config = &config.disk_game;
    let Some(mapping) = game_config
        .controls
        .iter()
        .find(|mapping| mapping.disk_id == disk_id)
    else {
        return Ok(());
    };

    let lights = ctx.state.lights_mut();
    for strip_id in [&game_config.clockwise_strip, &game_config.counterclockwise_strip] {
        for panel_id in &mapping.panels {
            lights.set_color(strip_id, Some(panel_id), color)?;
        }
    }
    Ok(())
}
