use std::collections::HashSet;

use log::{debug, info};

use sculpture_shared::{Action, Game, ReplayGuard, Schema, Status, StoreError};

use crate::{
    animation::{Frame, FrameEffect, PanelAnimation},
    config::{SculptureConfig, SimonLevel},
    dispatch::TimerKey,
    error::SculptureError,
    logic::{GameContext, GameLogic},
};

const LEVEL: &str = "level";

pub const SEQUENCE_ANIMATION: &str = "simon-sequence";

/// Repeat the pattern shown on a strip. Each step of the pattern is a set of
/// panels which must all be released before the next step counts.
#[derive(Debug, Default)]
pub struct SimonGame {
    complete: bool,
    target_sequence_index: usize,
    target_sequence: HashSet<String>,
    received_input: bool,
}

impl SimonGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(ctx: &GameContext<'_>) -> Result<usize, StoreError> {
        ctx.state.game_data(Game::Simon)?.get_usize(LEVEL)
    }

    fn set_level(ctx: &mut GameContext<'_>, level: usize) -> Result<(), StoreError> {
        ctx.state.game_data_mut(Game::Simon)?.set(LEVEL, level)
    }

    fn current_level<'c>(ctx: &GameContext<'c>) -> Result<&'c SimonLevel, SculptureError> {
        let level = Self::level(ctx)?;
        let config: &'c SculptureConfig = ctx.config;
        config
            .simon_game
            .levels
            .get(level)
            .ok_or(SculptureError::InvalidLevel { game: "simon", level })
    }

    /// A peer may finish the last level; its merged level is then past the end
    fn sync_completion(&mut self, ctx: &GameContext<'_>) -> Result<(), SculptureError> {
        if !self.complete && Self::level(ctx)? >= ctx.config.simon_game.levels.len() {
            info!("Simon game was completed by a peer");
            self.complete = true;
            self.discard_input();
        }
        Ok(())
    }

    fn is_ready_and_not_animating(ctx: &GameContext<'_>) -> Result<bool, StoreError> {
        Ok(ctx.state.is_ready()? && !ctx.state.is_animation_running())
    }

    fn discard_input(&mut self) {
        self.target_sequence_index = 0;
        self.target_sequence.clear();
        self.received_input = false;
    }

    fn play_current_sequence(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        let level = Self::level(ctx)?;
        let level_data = Self::current_level(ctx)?;
        let config = &ctx.config.simon_game;

        self.discard_input();
        ctx.scheduler.cancel(&TimerKey::SimonReplay);
        ctx.scheduler.cancel(&TimerKey::SimonInputTimeout);

        let delay = level_data.frame_delay.unwrap_or(config.sequence_frame_delay);
        let normalize = FrameEffect::NormalizeStrip {
            strip_id: level_data.strip_id.clone(),
            color: config.default_panel_color.clone(),
            intensity: config.available_panel_intensity,
        };

        let mut frames: Vec<Frame> = level_data
            .panel_sequence
            .iter()
            .map(|panel_ids| {
                Frame::new(delay)
                    .with(normalize.clone())
                    .with(FrameEffect::LightPanels {
                        strip_id: level_data.strip_id.clone(),
                        panel_ids: panel_ids.clone(),
                        color: config.default_panel_color.clone(),
                        intensity: config.target_panel_intensity,
                    })
            })
            .collect();
        frames.push(Frame::new(delay).with(normalize));

        let animation = PanelAnimation::new(SEQUENCE_ANIMATION, frames)
            .on_complete(Action::SimonSequenceFinished { level });
        ctx.state.play_animation(animation, ctx.scheduler)?;
        Ok(())
    }

    /// The pattern finished showing: show it again if nobody starts playing
    fn finish_play_sequence(&mut self, level: usize, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        if self.complete || Self::level(ctx)? != level {
            return Ok(());
        }

        ctx.scheduler.schedule(
            TimerKey::SimonReplay,
            ctx.config.simon_game.delay_between_plays,
            Action::ReplaySimonPattern {
                guard: Some(ReplayGuard {
                    level,
                    after_input: false,
                }),
            },
        );
        Ok(())
    }

    fn replay(
        &mut self,
        guard: Option<ReplayGuard>,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        if self.complete {
            return Ok(());
        }

        if let Some(guard) = guard {
            let still_valid = Self::is_ready_and_not_animating(ctx)?
                && self.received_input == guard.after_input
                && Self::level(ctx)? == guard.level;
            if !still_valid {
                debug!("Skipping stale Simon replay for level {}", guard.level);
                return Ok(());
            }
        }

        self.play_current_sequence(ctx)
    }

    fn panel_pressed(
        &mut self,
        strip_id: &str,
        panel_id: &str,
        pressed: bool,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        if self.complete || !ctx.state.is_ready()? || ctx.state.is_animation_running() {
            return Ok(());
        }

        let config = ctx.config;
        let color = ctx.own_color().to_string();
        let lights = ctx.state.lights_mut();
        if pressed {
            lights.set_color(strip_id, Some(panel_id), &color)?;
            lights.set_intensity(
                strip_id,
                Some(panel_id),
                config.panel_defaults.active_intensity,
            )?;
        } else {
            lights.set_default_color(strip_id, Some(panel_id))?;
            lights.set_intensity(
                strip_id,
                Some(panel_id),
                config.panel_defaults.inactive_intensity,
            )?;
        }

        let level = Self::level(ctx)?;
        let level_data = Self::current_level(ctx)?;
        // steps count on release
        if pressed || level_data.strip_id != strip_id {
            return Ok(());
        }

        if !self.received_input {
            self.received_input = true;
            self.target_sequence = step_panels(level_data, self.target_sequence_index);
            ctx.scheduler.cancel(&TimerKey::SimonReplay);
            ctx.scheduler.schedule(
                TimerKey::SimonInputTimeout,
                config.simon_game.input_timeout,
                Action::ReplaySimonPattern {
                    guard: Some(ReplayGuard {
                        level,
                        after_input: true,
                    }),
                },
            );
        }

        if !self.target_sequence.remove(panel_id) {
            info!("Wrong Simon panel {} on strip {}", panel_id, strip_id);
            ctx.state.set_status(Status::Failure)?;
            return Ok(());
        }

        if !self.target_sequence.is_empty() {
            return Ok(());
        }

        self.target_sequence_index += 1;
        if self.target_sequence_index >= level_data.panel_sequence.len() {
            self.win_level(ctx)
        } else {
            self.target_sequence = step_panels(level_data, self.target_sequence_index);
            Ok(())
        }
    }

    fn win_level(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        let level = Self::level(ctx)?;
        let strip_id = Self::current_level(ctx)?.strip_id.as_str();

        ctx.scheduler.cancel(&TimerKey::SimonInputTimeout);
        let lights = ctx.state.lights_mut();
        lights.deactivate_all(None)?;
        lights.set_intensity(strip_id, None, 0)?;
        ctx.state.set_status(Status::Success)?;

        let next_level = level + 1;
        if next_level >= ctx.config.simon_game.levels.len() {
            self.complete = true;
        }
        Self::set_level(ctx, next_level)?;
        info!("Simon level {} solved", level);
        Ok(())
    }
}

impl GameLogic for SimonGame {
    fn tracked_properties() -> Schema {
        Schema::new().value(LEVEL, 0)
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        self.complete = false;
        Self::set_level(ctx, 0)?;
        self.play_current_sequence(ctx)
    }

    fn end(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        ctx.scheduler.cancel(&TimerKey::SimonReplay);
        ctx.scheduler.cancel(&TimerKey::SimonInputTimeout);
        if ctx.state.animation().map(PanelAnimation::name) == Some(SEQUENCE_ANIMATION) {
            ctx.state.stop_animation(ctx.scheduler)?;
        }

        let config = ctx.config;
        let lights = ctx.state.lights_mut();
        lights.deactivate_all(None)?;
        for strip_id in &config.lights.game_strips {
            lights.set_intensity(strip_id, None, 0)?;
        }
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
                strip_id,
                panel_id,
                pressed,
            } => self.panel_pressed(strip_id, panel_id, *pressed, ctx),
            Action::FinishStatusAnimation => {
                if self.complete {
                    let delay = ctx.config.simon_game.transition_out_time;
                    ctx.schedule_next_game(delay);
                    Ok(())
                } else {
                    self.play_current_sequence(ctx)
                }
            }
            Action::ReplaySimonPattern { guard } => self.replay(*guard, ctx),
            Action::SimonSequenceFinished { level } => self.finish_play_sequence(*level, ctx),
            _ => Ok(()),
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

fn step_panels(level: &SimonLevel, index: usize) -> HashSet<String> {
    level
        .panel_sequence
        .get(index)
        .map(|panels| panels.iter().cloned().collect())
        .unwrap_or_default()
}
