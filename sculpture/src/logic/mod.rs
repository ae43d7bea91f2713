//! Game logic.
//!
//! Each game sees every action after the store's own handlers have run. A
//! game keeps its progress in its own tracked sub-store (so peers receive
//! it), reads that progress back on every action, and never calls into the
//! store: follow-up work, including moving on to the next game, is
//! scheduled as an action.

mod disk;
mod handshake;
mod mole;
mod simon;

pub use disk::{shortest_arc, DiskGame};
pub use handshake::HandshakeGame;
pub use mole::{MoleGame, MolePanelState};
pub use simon::SimonGame;

use std::time::Duration;

use fastrand::Rng;

use sculpture_shared::{Action, Game, LightArray, Schema};

use crate::{
    config::SculptureConfig,
    dispatch::{Scheduler, TimerKey},
    error::SculptureError,
    state::SculptureState,
};

/// Everything a game may touch while handling an action
pub struct GameContext<'a> {
    pub state: &'a mut SculptureState,
    pub scheduler: &'a mut Scheduler,
    pub config: &'a SculptureConfig,
    pub rng: &'a mut Rng,
}

impl<'a> GameContext<'a> {
    pub fn new(
        state: &'a mut SculptureState,
        scheduler: &'a mut Scheduler,
        config: &'a SculptureConfig,
        rng: &'a mut Rng,
    ) -> Self {
        Self {
            state,
            scheduler,
            config,
            rng,
        }
    }

    pub fn lights(&mut self) -> &mut LightArray {
        self.state.lights_mut()
    }

    /// Color of the user this sculpture belongs to
    pub fn own_color(&self) -> &str {
        self.config.own_color()
    }

    /// Hand control to the next game in the sequence after `delay`
    pub fn schedule_next_game(&mut self, delay: Duration) {
        self.scheduler
            .schedule(TimerKey::GameTransition, delay, Action::StartNextGame);
    }
}

pub trait GameLogic {
    /// Properties (with defaults) of this game's tracked sub-store
    fn tracked_properties() -> Schema
    where
        Self: Sized;

    fn start(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError>;

    fn end(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError>;

    fn handle_action(
        &mut self,
        action: &Action,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError>;

    fn is_complete(&self) -> bool;
}

pub fn tracked_properties(game: Game) -> Schema {
    match game {
        Game::Handshake => HandshakeGame::tracked_properties(),
        Game::Mole => MoleGame::tracked_properties(),
        Game::Disk => DiskGame::tracked_properties(),
        Game::Simon => SimonGame::tracked_properties(),
    }
}

/// The game currently running on a sculpture
pub enum ActiveGame {
    Handshake(HandshakeGame),
    Mole(MoleGame),
    Disk(DiskGame),
    Simon(SimonGame),
}

impl ActiveGame {
    pub fn new(game: Game) -> Self {
        match game {
            Game::Handshake => ActiveGame::Handshake(HandshakeGame::new()),
            Game::Mole => ActiveGame::Mole(MoleGame::new()),
            Game::Disk => ActiveGame::Disk(DiskGame::new()),
            Game::Simon => ActiveGame::Simon(SimonGame::new()),
        }
    }

    pub fn game(&self) -> Game {
        match self {
            ActiveGame::Handshake(_) => Game::Handshake,
            ActiveGame::Mole(_) => Game::Mole,
            ActiveGame::Disk(_) => Game::Disk,
            ActiveGame::Simon(_) => Game::Simon,
        }
    }

    pub fn logic(&self) -> &dyn GameLogic {
        match self {
            ActiveGame::Handshake(game) => game,
            ActiveGame::Mole(game) => game,
            ActiveGame::Disk(game) => game,
            ActiveGame::Simon(game) => game,
        }
    }

    pub fn logic_mut(&mut self) -> &mut dyn GameLogic {
        match self {
            ActiveGame::Handshake(game) => game,
            ActiveGame::Mole(game) => game,
            ActiveGame::Disk(game) => game,
            ActiveGame::Simon(game) => game,
        }
    }
}
