use std::{collections::HashMap, time::Duration};

use log::{debug, info};

use sculpture_shared::{Action, Game, PanelRef, Schema, Status, StoreError, TrackedStore, Value};

use crate::{
    config::{LifetimeBreakpoint, MoleGameConfig},
    dispatch::TimerKey,
    error::SculptureError,
    logic::{GameContext, GameLogic},
};

const PANEL_COUNT: &str = "panelCount";
const PANELS: &str = "panels";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MolePanelState {
    Off,
    On,
    /// Found, shown in the finder's color and never picked again
    Ignored,
}

impl MolePanelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MolePanelState::Off => "off",
            MolePanelState::On => "on",
            MolePanelState::Ignored => "ignored",
        }
    }

    fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("on") => MolePanelState::On,
            Some("ignored") => MolePanelState::Ignored,
            _ => MolePanelState::Off,
        }
    }
}

/// Whack-a-mole over the game strips.
///
/// Panels are lit one after another, first from a fixed opening sequence and
/// then at random among untouched panels. Each lit panel moves elsewhere when
/// its lifetime runs out, and finding one lights one or more replacements.
#[derive(Debug, Default)]
pub struct MoleGame {
    complete: bool,
    next_initial_panel: usize,
    next_activation: u64,
    // found panel -> finder's color
    found_colors: HashMap<PanelRef, String>,
}

impl MoleGame {
    pub fn new() -> Self {
        Self::default()
    }

    fn data<'c>(ctx: &'c GameContext<'_>) -> Result<&'c TrackedStore, StoreError> {
        ctx.state.game_data(Game::Mole)
    }

    fn data_mut<'c>(ctx: &'c mut GameContext<'_>) -> Result<&'c mut TrackedStore, StoreError> {
        ctx.state.game_data_mut(Game::Mole)
    }

    pub fn panel_count(ctx: &GameContext<'_>) -> Result<u32, StoreError> {
        Self::data(ctx)?.get_u32(PANEL_COUNT)
    }

    pub fn panel_state(
        ctx: &GameContext<'_>,
        panel: &PanelRef,
    ) -> Result<MolePanelState, StoreError> {
        let panels = Self::data(ctx)?.get_store(PANELS)?;
        Ok(MolePanelState::from_value(panels.get(&panel.to_string())?))
    }

    fn set_panel_state(
        ctx: &mut GameContext<'_>,
        panel: &PanelRef,
        state: MolePanelState,
    ) -> Result<(), StoreError> {
        Self::data_mut(ctx)?
            .get_store_mut(PANELS)?
            .set(&panel.to_string(), state.as_str())
    }

    /// Light the next panel, if one is available
    fn avail_panel(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        if self.complete {
            return Ok(());
        }

        let Some(panel) = self.next_panel(ctx)? else {
            debug!("No untouched mole panel left to light");
            return Ok(());
        };

        let config = &ctx.config.mole_game;
        let lifetime = panel_lifetime(config, Self::panel_count(ctx)?, ctx.rng.f64());
        let intensity = config.active_panel_intensity;

        Self::set_panel_state(ctx, &panel, MolePanelState::On)?;
        let lights = ctx.state.lights_mut();
        lights.set_default_color(&panel.strip_id, Some(&panel.panel_id))?;
        lights.set_intensity(&panel.strip_id, Some(&panel.panel_id), intensity)?;

        ctx.scheduler.schedule(
            TimerKey::MoleLifetime(panel.clone()),
            lifetime,
            Action::mole_move_panel(panel.strip_id, panel.panel_id),
        );
        Ok(())
    }

    /// The opening sequence first, then a uniformly random untouched panel
    fn next_panel(&mut self, ctx: &mut GameContext<'_>) -> Result<Option<PanelRef>, StoreError> {
        let config = ctx.config;
        let initial_panels = &config.mole_game.initial_panels;
        while self.next_initial_panel < initial_panels.len() {
            let candidate = &initial_panels[self.next_initial_panel];
            self.next_initial_panel += 1;
            if Self::panel_state(ctx, candidate)? == MolePanelState::Off {
                return Ok(Some(candidate.clone()));
            }
        }

        let mut pool = Vec::new();
        for strip_id in &config.lights.game_strips {
            for panel_id in ctx.state.lights().panel_ids(strip_id)? {
                let panel = PanelRef::new(strip_id.as_str(), panel_id);
                if Self::panel_state(ctx, &panel)? == MolePanelState::Off {
                    pool.push(panel);
                }
            }
        }

        if pool.is_empty() {
            return Ok(None);
        }
        let index = ctx.rng.usize(..pool.len());
        Ok(Some(pool.swap_remove(index)))
    }

    /// A lit panel's lifetime ran out: turn it off and light another
    fn move_panel(
        &mut self,
        panel: PanelRef,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        if self.complete || Self::panel_state(ctx, &panel)? != MolePanelState::On {
            debug!("Ignoring expired lifetime of mole panel {}", panel);
            return Ok(());
        }

        self.turn_off(&panel, ctx)?;
        let delay = ctx.config.mole_game.panel_move_delay;
        self.schedule_activation(delay, ctx);
        Ok(())
    }

    fn turn_off(&mut self, panel: &PanelRef, ctx: &mut GameContext<'_>) -> Result<(), StoreError> {
        Self::set_panel_state(ctx, panel, MolePanelState::Off)?;
        let intensity = ctx.config.mole_game.inactive_panel_intensity;
        let lights = ctx.state.lights_mut();
        lights.set_intensity(&panel.strip_id, Some(&panel.panel_id), intensity)?;
        lights.set_default_color(&panel.strip_id, Some(&panel.panel_id))
    }

    fn schedule_activation(&mut self, delay: Duration, ctx: &mut GameContext<'_>) {
        let key = TimerKey::MoleActivation(self.next_activation);
        self.next_activation = self.next_activation.wrapping_add(1);
        ctx.scheduler.schedule(key, delay, Action::MoleAvailPanel);
    }

    fn panel_pressed(
        &mut self,
        panel: PanelRef,
        pressed: bool,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        if self.complete || !ctx.state.is_ready()? {
            return Ok(());
        }

        match Self::panel_state(ctx, &panel)? {
            MolePanelState::On if pressed => self.find_panel(panel, ctx),
            MolePanelState::Ignored => {
                // keep found panels in their finder's color through presses
                let Some(color) = self.found_colors.get(&panel) else {
                    return Ok(());
                };
                let intensity = ctx.config.mole_game.colored_panel_intensity;
                let lights = ctx.state.lights_mut();
                lights.set_color(&panel.strip_id, Some(&panel.panel_id), color)?;
                lights.set_intensity(&panel.strip_id, Some(&panel.panel_id), intensity)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn find_panel(
        &mut self,
        panel: PanelRef,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        ctx.scheduler.cancel(&TimerKey::MoleLifetime(panel.clone()));

        let color = ctx.own_color().to_string();
        let sculpture_config = ctx.config;
        let config = &sculpture_config.mole_game;
        let colored_intensity = config.colored_panel_intensity;
        Self::set_panel_state(ctx, &panel, MolePanelState::Ignored)?;
        let lights = ctx.state.lights_mut();
        lights.set_color(&panel.strip_id, Some(&panel.panel_id), &color)?;
        lights.set_intensity(&panel.strip_id, Some(&panel.panel_id), colored_intensity)?;
        self.found_colors.insert(panel, color);

        let count = Self::panel_count(ctx)? + 1;
        Self::data_mut(ctx)?.set(PANEL_COUNT, count)?;

        if count >= config.game_end {
            self.win_game(ctx)?;
            return Ok(());
        }

        let replacements = 1 + active_panel_delta(config, count);
        for _ in 0..replacements.max(0) {
            self.schedule_activation(config.panel_success_delay, ctx);
        }
        Ok(())
    }

    fn win_game(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        info!("Mole game won");
        self.complete = true;
        cancel_timers(ctx);

        let lit: Vec<PanelRef> = {
            let panels = Self::data(ctx)?.get_store(PANELS)?;
            panels
                .names()
                .filter(|key| {
                    matches!(
                        panels.get(key).map(MolePanelState::from_value),
                        Ok(MolePanelState::On)
                    )
                })
                .filter_map(parse_panel_key)
                .collect()
        };
        for panel in &lit {
            self.turn_off(panel, ctx)?;
        }

        ctx.state.set_status(Status::Success)?;
        Ok(())
    }
}

impl GameLogic for MoleGame {
    fn tracked_properties() -> Schema {
        Schema::new()
            .value(PANEL_COUNT, 0)
            .store(PANELS, TrackedStore::unrestricted())
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        self.complete = false;
        self.next_initial_panel = 0;
        self.found_colors.clear();

        let data = Self::data_mut(ctx)?;
        data.set(PANEL_COUNT, 0)?;
        let panels = data.get_store_mut(PANELS)?;
        let keys: Vec<String> = panels.names().map(str::to_string).collect();
        for key in keys {
            panels.set(&key, MolePanelState::Off.as_str())?;
        }

        let intensity = ctx.config.mole_game.inactive_panel_intensity;
        for strip_id in &ctx.config.lights.game_strips {
            ctx.state.lights_mut().set_intensity(strip_id, None, intensity)?;
        }

        self.avail_panel(ctx)
    }

    fn end(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        cancel_timers(ctx);

        let intensity = ctx.config.mole_game.inactive_panel_intensity;
        let lights = ctx.state.lights_mut();
        lights.deactivate_all(None)?;
        for strip_id in &ctx.config.lights.game_strips {
            lights.set_intensity(strip_id, None, intensity)?;
        }
        Ok(())
    }

    fn handle_action(
        &mut self,
        action: &Action,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        match action {
            Action::MoleAvailPanel => self.avail_panel(ctx),
            Action::MoleMovePanel { strip_id, panel_id } => {
                self.move_panel(PanelRef::new(strip_id.as_str(), panel_id.as_str()), ctx)
            }
            Action::PanelPressed {
                strip_id,
                panel_id,
                pressed,
            } => self.panel_pressed(
                PanelRef::new(strip_id.as_str(), panel_id.as_str()),
                *pressed,
                ctx,
            ),
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

fn cancel_timers(ctx: &mut GameContext<'_>) {
    ctx.scheduler.cancel_where(|key| {
        matches!(key, TimerKey::MoleLifetime(_) | TimerKey::MoleActivation(_))
    });
}

fn parse_panel_key(key: &str) -> Option<PanelRef> {
    let (strip_id, panel_id) = key.split_once(',')?;
    Some(PanelRef::new(strip_id, panel_id))
}

/// Change in the number of simultaneously lit panels once `count` panels were found
pub fn active_panel_delta(config: &MoleGameConfig, count: u32) -> i32 {
    config
        .active_panel_deltas
        .iter()
        .find(|(at, _)| *at == count)
        .map(|(_, delta)| *delta)
        .unwrap_or(0)
}

/// Lifetime of a newly lit panel. `roll` in `[0, 1)` picks a point within
/// the interpolated range.
pub fn panel_lifetime(config: &MoleGameConfig, count: u32, roll: f64) -> Duration {
    let (min, max) = lifetime_range(&config.panel_lifetimes, count);
    Duration::from_secs_f64(min + (max - min) * roll.clamp(0.0, 1.0))
}

/// Bounds, in seconds, for `count`, linearly interpolated between breakpoints
/// and held constant past either end of the table
pub fn lifetime_range(breakpoints: &[LifetimeBreakpoint], count: u32) -> (f64, f64) {
    let bounds = |breakpoint: &LifetimeBreakpoint| {
        (breakpoint.min.as_secs_f64(), breakpoint.max.as_secs_f64())
    };

    let Some(first) = breakpoints.first() else {
        return (0.0, 0.0);
    };
    if count <= first.count {
        return bounds(first);
    }

    for pair in breakpoints.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        if count < to.count {
            let progress = f64::from(count - from.count) / f64::from(to.count - from.count);
            let (from_min, from_max) = bounds(from);
            let (to_min, to_max) = bounds(to);
            return (
                from_min + (to_min - from_min) * progress,
                from_max + (to_max - from_max) * progress,
            );
        }
    }

    breakpoints.last().map(bounds).unwrap_or((0.0, 0.0))
}
