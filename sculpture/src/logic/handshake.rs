use log::{debug, info};

use sculpture_shared::{Action, Schema};

use crate::{
    error::SculptureError,
    logic::{GameContext, GameLogic},
};

/// Waits for this sculpture's own user to touch a handshake, then moves
/// everyone on to the next game. Peers follow through the merged
/// `currentGame`.
#[derive(Debug, Default)]
pub struct HandshakeGame {
    complete: bool,
}

impl HandshakeGame {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameLogic for HandshakeGame {
    fn tracked_properties() -> Schema {
        Schema::new()
    }

    fn start(&mut self, _ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        self.complete = false;
        Ok(())
    }

    fn end(&mut self, ctx: &mut GameContext<'_>) -> Result<(), SculptureError> {
        ctx.lights().deactivate_all(None)?;
        Ok(())
    }

    fn handle_action(
        &mut self,
        action: &Action,
        ctx: &mut GameContext<'_>,
    ) -> Result<(), SculptureError> {
        if self.complete {
            return Ok(());
        }

        match action {
            Action::HandshakeActivate { user } if *user == ctx.config.username => {
                self.complete = true;
                info!("Handshake from {}, starting the next game", user);
                ctx.schedule_next_game(ctx.config.handshake_game.transition_out_time);
            }
            Action::HandshakeActivate { user } => {
                debug!("Handshake from peer {}", user);
            }
            _ => {}
        }

        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}
