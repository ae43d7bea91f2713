use std::mem;

use fastrand::Rng;
use log::{debug, info, warn};

use sculpture_shared::{Action, Diff, DiskUpdate, Game, Status, Tracked};

use crate::{
    animation::status_animation,
    config::SculptureConfig,
    dispatch::{ActionHandler, Scheduler, TimerKey},
    error::SculptureError,
    logic::{ActiveGame, GameContext},
    state::SculptureState,
};

/// A published change-set: everything that changed during one cycle
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeEvent {
    pub changes: Diff,
}

/// Owns a sculpture's state and its running game, and applies each action
/// as one cycle:
///
/// 1. refuse to start if the state was mutated outside of a cycle
/// 2. drop the action if the sculpture is locked and the action is not allowed through
/// 3. run the store's own handlers
/// 4. forward the action to the running game
/// 5. start the status animation if the status turned `success` or `failure`
/// 6. publish the cycle's changes and clear them, even if a step failed
pub struct SculptureStore {
    config: SculptureConfig,
    state: SculptureState,
    game: Option<ActiveGame>,
    rng: Rng,
    outgoing: Vec<ChangeEvent>,
}

impl SculptureStore {
    pub fn new(config: SculptureConfig) -> Self {
        Self::with_rng(config, Rng::new())
    }

    /// Reproducible game randomness
    pub fn with_seed(config: SculptureConfig, seed: u64) -> Self {
        Self::with_rng(config, Rng::with_seed(seed))
    }

    pub fn with_rng(config: SculptureConfig, rng: Rng) -> Self {
        let state = SculptureState::new(&config);
        Self {
            config,
            state,
            game: None,
            rng,
            outgoing: Vec::new(),
        }
    }

    pub fn config(&self) -> &SculptureConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    /// The colour configured for the local user
    pub fn user_color(&self) -> &str {
        self.config.own_color()
    }

    pub fn state(&self) -> &SculptureState {
        &self.state
    }

    /// Direct mutable access, for bridges that report hardware state. Changes
    /// made here must be followed by `publish_changes` before the next action.
    pub fn state_mut(&mut self) -> &mut SculptureState {
        &mut self.state
    }

    pub fn active_game(&self) -> Option<&ActiveGame> {
        self.game.as_ref()
    }

    pub fn current_game(&self) -> Option<Game> {
        self.game.as_ref().map(ActiveGame::game)
    }

    pub fn is_playing(&self, game: Game) -> bool {
        self.current_game() == Some(game)
    }

    /// Change-sets published since the last drain, oldest first
    pub fn drain_changes(&mut self) -> Vec<ChangeEvent> {
        mem::take(&mut self.outgoing)
    }

    /// Wrap a published diff for sending to peers
    pub fn outgoing_merge(&self, changes: Diff) -> Action {
        Action::merge_state(self.config.username.clone(), changes)
    }

    /// Emit the current changes (if any) and clear them
    pub fn publish_changes(&mut self) {
        let changes = self.state.changed_current_values();
        if !changes.is_empty() {
            self.outgoing.push(ChangeEvent { changes });
        }
        self.state.clear_changes();
    }

    pub fn lock(&mut self) -> Result<(), SculptureError> {
        self.state.set_status(Status::Locked)?;
        Ok(())
    }

    pub fn restore_status(&mut self) -> Result<(), SculptureError> {
        self.state.set_status(Status::Ready)?;
        Ok(())
    }

    pub fn set_success_status(&mut self) -> Result<(), SculptureError> {
        self.state.set_status(Status::Success)?;
        Ok(())
    }

    pub fn set_failure_status(&mut self) -> Result<(), SculptureError> {
        self.state.set_status(Status::Failure)?;
        Ok(())
    }

    /// Ends the running game, resets the game strips and starts `game`
    pub(crate) fn start_game(
        &mut self,
        game: Game,
        scheduler: &mut Scheduler,
    ) -> Result<(), SculptureError> {
        // a transition scheduled by the previous game must not skip this one
        scheduler.cancel(&TimerKey::GameTransition);
        if let Some(mut previous) = self.game.take() {
            let mut ctx = GameContext::new(&mut self.state, scheduler, &self.config, &mut self.rng);
            previous.logic_mut().end(&mut ctx)?;
        }

        self.reset_game_strips()?;
        self.state.set_current_game(game)?;
        info!("Starting {} game", game);

        let mut next = ActiveGame::new(game);
        let mut ctx = GameContext::new(&mut self.state, scheduler, &self.config, &mut self.rng);
        next.logic_mut().start(&mut ctx)?;
        self.game = Some(next);
        Ok(())
    }

    fn move_to_next_game(&mut self, scheduler: &mut Scheduler) -> Result<(), SculptureError> {
        let sequence = &self.config.games_sequence;
        let Some(first) = sequence.first().copied() else {
            warn!("No games are configured, staying on the current game");
            return Ok(());
        };

        let next = match self.state.current_game()? {
            Some(current) => sequence
                .iter()
                .position(|game| *game == current)
                .and_then(|index| sequence.get(index + 1))
                .copied()
                .unwrap_or(first),
            None => first,
        };
        self.start_game(next, scheduler)
    }

    fn reset_game_strips(&mut self) -> Result<(), SculptureError> {
        let lights = self.state.lights_mut();
        for strip_id in &self.config.lights.game_strips {
            lights.set_default_color(strip_id, None)?;
            lights.set_default_intensity(strip_id, None)?;
        }
        Ok(())
    }

    fn panel_pressed(
        &mut self,
        strip_id: &str,
        panel_id: &str,
        pressed: bool,
    ) -> Result<(), SculptureError> {
        if !self.state.is_ready()? {
            return Ok(());
        }

        let lights = self.state.lights_mut();
        lights.activate(strip_id, panel_id, pressed)?;
        if pressed {
            lights.set_color(strip_id, Some(panel_id), self.config.own_color())?;
        } else {
            lights.set_default_color(strip_id, Some(panel_id))?;
        }
        Ok(())
    }

    fn disk_update(&mut self, update: &DiskUpdate) -> Result<(), SculptureError> {
        let Some(disk_id) = update.disk_id.as_deref() else {
            return Ok(());
        };

        let disk = self.state.disk_mut(disk_id)?;
        if let Some(position) = update.position {
            disk.rotate_to(position)?;
        }
        if let Some(direction) = update.direction {
            disk.set_direction(direction)?;
        }
        if let Some(user) = &update.user {
            disk.set_user(user)?;
        }
        if let Some(state) = update.state {
            disk.set_state(state)?;
        }
        Ok(())
    }

    fn delegate_action(
        &mut self,
        action: &Action,
        scheduler: &mut Scheduler,
    ) -> Result<(), SculptureError> {
        match action {
            Action::StartGame { game } => self.start_game(*game, scheduler),
            Action::StartNextGame => self.move_to_next_game(scheduler),
            Action::MergeState(payload) => self.merge_state(payload, scheduler),
            Action::RestoreStatus | Action::FinishStatusAnimation => self.restore_status(),
            Action::AnimationFrame { animation, frame } => {
                self.state
                    .run_animation_frame(*animation, *frame, scheduler)?;
                Ok(())
            }
            Action::HandshakeActivate { user } => {
                self.state.set_handshake(user, true)?;
                Ok(())
            }
            Action::HandshakeDeactivate { user } => {
                self.state.set_handshake(user, false)?;
                Ok(())
            }
            Action::PanelPressed {
                strip_id,
                panel_id,
                pressed,
            } => self.panel_pressed(strip_id, panel_id, *pressed),
            Action::DiskUpdate(update) => self.disk_update(update),
            Action::MoleAvailPanel
            | Action::MoleMovePanel { .. }
            | Action::ReplaySimonPattern { .. }
            | Action::SimonSequenceFinished { .. } => Ok(()),
        }
    }

    fn run_cycle(&mut self, action: &Action, scheduler: &mut Scheduler) -> Result<(), SculptureError> {
        self.delegate_action(action, scheduler)?;

        if let Some(game) = self.game.as_mut() {
            let mut ctx = GameContext::new(&mut self.state, scheduler, &self.config, &mut self.rng);
            game.logic_mut().handle_action(action, &mut ctx)?;
        }

        self.play_status_animation(scheduler)
    }

    fn play_status_animation(&mut self, scheduler: &mut Scheduler) -> Result<(), SculptureError> {
        if !self.state.status_changed() {
            return Ok(());
        }

        let color = match self.state.status()? {
            Status::Success => self.config.own_color(),
            Status::Failure => self.config.colors.error.as_str(),
            Status::Ready | Status::Locked => return Ok(()),
        };

        let animation = status_animation(
            &self.config.status_animation,
            color,
            &self.config.lights.default_color,
        );
        self.state.play_animation(animation, scheduler)?;
        Ok(())
    }
}

impl ActionHandler for SculptureStore {
    fn handle(&mut self, action: Action, scheduler: &mut Scheduler) -> Result<(), SculptureError> {
        if self.state.has_changes() {
            let changed: Vec<String> = self
                .state
                .changed_current_values()
                .keys()
                .cloned()
                .collect();
            return Err(SculptureError::OutOfCycleMutation {
                changed: changed.join(", "),
            });
        }

        if self.state.is_locked()? && !action.runs_when_locked() {
            debug!("Sculpture is locked, dropping '{}'", action.action_type());
            return Ok(());
        }

        // whatever a failed cycle already applied is still published
        let result = self.run_cycle(&action, scheduler);
        self.publish_changes();
        result
    }
}
