use std::cmp::Ordering;

use log::debug;

use crate::{
    store::{
        error::StoreError,
        schema::Schema,
        tracked::Tracked,
        tracked_store::{Diff, TrackedStore},
    },
    types::{Direction, DiskState},
};

pub const POSITION: &str = "position";
pub const DIRECTION: &str = "direction";
pub const CLOCKWISE_PULL: &str = "clockwisePull";
pub const COUNTERCLOCKWISE_PULL: &str = "counterclockwisePull";
pub const USER: &str = "user";
pub const STATE: &str = "state";

/// A rotating disk. Every participant pressing a control adds a pull in one
/// direction, and the published `direction` is arbitrated from the two pull
/// counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Disk {
    data: TrackedStore,
}

impl Disk {
    pub fn new() -> Self {
        Self::with_position(0.0)
    }

    pub fn with_position(position: f64) -> Self {
        Self {
            data: TrackedStore::new(
                Schema::new()
                    .value(POSITION, position)
                    .value(DIRECTION, Direction::Stopped)
                    .value(CLOCKWISE_PULL, 0)
                    .value(COUNTERCLOCKWISE_PULL, 0)
                    .value(USER, "")
                    .value(STATE, DiskState::Ready),
            ),
        }
    }

    /// Arbitration rule: the larger pull wins, equal non-zero pulls conflict
    pub fn resolve(clockwise_pull: u32, counterclockwise_pull: u32) -> Direction {
        match clockwise_pull.cmp(&counterclockwise_pull) {
            Ordering::Greater => Direction::Clockwise,
            Ordering::Less => Direction::Counterclockwise,
            Ordering::Equal if clockwise_pull == 0 => Direction::Stopped,
            Ordering::Equal => Direction::Conflict,
        }
    }

    pub fn data(&self) -> &TrackedStore {
        &self.data
    }

    pub fn position(&self) -> Result<f64, StoreError> {
        self.data.get_f64(POSITION)
    }

    pub fn rotate_to(&mut self, position: f64) -> Result<(), StoreError> {
        self.data.set(POSITION, position)
    }

    pub fn direction(&self) -> Result<Direction, StoreError> {
        self.data.get_as(DIRECTION)
    }

    pub fn clockwise_pull(&self) -> Result<u32, StoreError> {
        self.data.get_u32(CLOCKWISE_PULL)
    }

    pub fn counterclockwise_pull(&self) -> Result<u32, StoreError> {
        self.data.get_u32(COUNTERCLOCKWISE_PULL)
    }

    pub fn user(&self) -> Result<&str, StoreError> {
        self.data.get_str(USER)
    }

    pub fn set_user(&mut self, user: &str) -> Result<(), StoreError> {
        self.data.set(USER, user)
    }

    pub fn state(&self) -> Result<DiskState, StoreError> {
        self.data.get_as(STATE)
    }

    pub fn set_state(&mut self, state: DiskState) -> Result<(), StoreError> {
        self.data.set(STATE, state)
    }

    pub fn is_stopped(&self) -> Result<bool, StoreError> {
        Ok(self.direction()? == Direction::Stopped)
    }

    pub fn is_conflicting(&self) -> Result<bool, StoreError> {
        Ok(self.direction()? == Direction::Conflict)
    }

    /// Add one pull in `direction`. `Stopped` zeroes both pulls; `Conflict`
    /// only ever results from the pulls and adds nothing.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), StoreError> {
        match direction {
            Direction::Stopped => {
                self.data.set(CLOCKWISE_PULL, 0)?;
                self.data.set(COUNTERCLOCKWISE_PULL, 0)?;
            }
            Direction::Clockwise => {
                let pull = self.clockwise_pull()?;
                self.data.set(CLOCKWISE_PULL, pull.saturating_add(1))?;
            }
            Direction::Counterclockwise => {
                let pull = self.counterclockwise_pull()?;
                self.data
                    .set(COUNTERCLOCKWISE_PULL, pull.saturating_add(1))?;
            }
            Direction::Conflict => {}
        }
        self.resolve_direction()
    }

    /// Release one pull in `direction`, never dropping below zero
    pub fn unset_direction(&mut self, direction: Direction) -> Result<(), StoreError> {
        let (name, pull) = match direction {
            Direction::Clockwise => (CLOCKWISE_PULL, self.clockwise_pull()?),
            Direction::Counterclockwise => (COUNTERCLOCKWISE_PULL, self.counterclockwise_pull()?),
            Direction::Stopped | Direction::Conflict => return self.resolve_direction(),
        };
        if pull == 0 {
            debug!("Releasing a {} pull that was never added", direction);
        }
        self.data.set(name, pull.saturating_sub(1))?;
        self.resolve_direction()
    }

    /// Overwrite both pull counts, as received from a peer, and re-arbitrate
    pub fn set_pulls(
        &mut self,
        clockwise_pull: u32,
        counterclockwise_pull: u32,
    ) -> Result<(), StoreError> {
        self.data.set(CLOCKWISE_PULL, clockwise_pull)?;
        self.data
            .set(COUNTERCLOCKWISE_PULL, counterclockwise_pull)?;
        self.resolve_direction()
    }

    pub fn stop(&mut self) -> Result<(), StoreError> {
        self.set_direction(Direction::Stopped)
    }

    pub fn turn_clockwise(&mut self) -> Result<(), StoreError> {
        self.set_direction(Direction::Clockwise)
    }

    pub fn turn_counterclockwise(&mut self) -> Result<(), StoreError> {
        self.set_direction(Direction::Counterclockwise)
    }

    fn resolve_direction(&mut self) -> Result<(), StoreError> {
        let resolved = Self::resolve(self.clockwise_pull()?, self.counterclockwise_pull()?);
        if self.direction()? != resolved {
            self.data.set(DIRECTION, resolved)?;
        }
        Ok(())
    }
}

impl Default for Disk {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracked for Disk {
    fn has_changes(&self) -> bool {
        self.data.has_changes()
    }

    fn changed_current_values(&self) -> Diff {
        self.data.changed_current_values()
    }

    fn changed_old_values(&self) -> Diff {
        self.data.changed_old_values()
    }

    fn clear_changes(&mut self) {
        self.data.clear_changes();
    }
}
