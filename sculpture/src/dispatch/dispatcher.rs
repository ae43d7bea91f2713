use std::{collections::VecDeque, time::Duration};

use log::{debug, warn};

use sculpture_shared::Action;

use crate::{dispatch::scheduler::Scheduler, error::SculptureError};

/// Something that runs one complete handling cycle per action. Follow-up
/// work is never dispatched directly; it is scheduled on the `Scheduler`
/// and handled in a later cycle.
pub trait ActionHandler {
    fn handle(&mut self, action: Action, scheduler: &mut Scheduler) -> Result<(), SculptureError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DispatchToken(u32);

/// Serializes actions into a single handler.
///
/// Every action, whether dispatched from outside or fired by a timer, runs
/// to completion before the next one starts, so a handler never observes a
/// half-applied cycle.
pub struct Dispatcher<H: ActionHandler> {
    handler: Option<(DispatchToken, H)>,
    next_token: u32,
    pending: VecDeque<Action>,
    scheduler: Scheduler,
}

impl<H: ActionHandler> Dispatcher<H> {
    pub fn new() -> Self {
        Self {
            handler: None,
            next_token: 0,
            pending: VecDeque::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Only one handler may be registered at a time
    pub fn register(&mut self, handler: H) -> Result<DispatchToken, SculptureError> {
        if self.handler.is_some() {
            return Err(SculptureError::HandlerAlreadyRegistered);
        }

        let token = DispatchToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.handler = Some((token, handler));
        Ok(token)
    }

    pub fn unregister(&mut self, token: DispatchToken) -> Option<H> {
        let registered = matches!(&self.handler, Some((registered, _)) if *registered == token);
        if !registered {
            warn!("Attempted to unregister an unknown dispatch token: {:?}", token);
            return None;
        }
        self.handler.take().map(|(_, handler)| handler)
    }

    /// Handle `action`, then every timer that became due at the current time
    pub fn dispatch(&mut self, action: Action) -> Result<(), SculptureError> {
        if self.handler.is_none() {
            return Err(SculptureError::NoHandlerRegistered);
        }
        self.pending.push_back(action);
        self.run_until(self.scheduler.now())
    }

    /// Move the clock forward by `elapsed`, handling every timer that falls
    /// due along the way, each in its own cycle
    pub fn advance(&mut self, elapsed: Duration) -> Result<(), SculptureError> {
        let until = self.scheduler.now() + elapsed;
        self.run_until(until)?;
        self.scheduler.advance_to(until);
        Ok(())
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref().map(|(_, handler)| handler)
    }

    pub fn handler_mut(&mut self) -> Option<&mut H> {
        self.handler.as_mut().map(|(_, handler)| handler)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    fn run_until(&mut self, until: Duration) -> Result<(), SculptureError> {
        let Some((_, handler)) = self.handler.as_mut() else {
            return Err(SculptureError::NoHandlerRegistered);
        };

        loop {
            let action = match self.pending.pop_front() {
                Some(action) => action,
                None => match self.scheduler.pop_due(until) {
                    Some(action) => action,
                    None => break,
                },
            };

            debug!(
                "Dispatching '{}' at {:?}",
                action.action_type(),
                self.scheduler.now()
            );
            if let Err(error) = handler.handle(action, &mut self.scheduler) {
                self.pending.clear();
                return Err(error);
            }
        }

        Ok(())
    }
}

impl<H: ActionHandler> Default for Dispatcher<H> {
    fn default() -> Self {
        Self::new()
    }
}
