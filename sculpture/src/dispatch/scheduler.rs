use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use sculpture_shared::{Action, PanelRef};

/// Identifies a pending timer. Scheduling under a key that is already
/// pending replaces the earlier timer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    AnimationFrame,
    AnimationComplete,
    MoleLifetime(PanelRef),
    MoleActivation(u64),
    SimonReplay,
    SimonInputTimeout,
    GameTransition,
}

struct ScheduledAction {
    key: TimerKey,
    action: Action,
}

/// Virtual clock plus the actions waiting for it. Timers fire in due order;
/// timers due at the same instant fire in the order they were scheduled.
pub struct Scheduler {
    now: Duration,
    next_sequence: u64,
    queue: BTreeMap<(Duration, u64), ScheduledAction>,
    slots: HashMap<TimerKey, (Duration, u64)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_sequence: 0,
            queue: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }

    /// Time elapsed since the scheduler was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Dispatch `action` once `delay` has elapsed
    pub fn schedule(&mut self, key: TimerKey, delay: Duration, action: Action) {
        self.cancel(&key);

        let slot = (self.now + delay, self.next_sequence);
        self.next_sequence = self.next_sequence.wrapping_add(1);

        self.slots.insert(key.clone(), slot);
        self.queue.insert(slot, ScheduledAction { key, action });
    }

    /// Returns whether a timer was pending under `key`
    pub fn cancel(&mut self, key: &TimerKey) -> bool {
        match self.slots.remove(key) {
            Some(slot) => {
                self.queue.remove(&slot);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer whose key matches, returning how many were cancelled
    pub fn cancel_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&TimerKey) -> bool,
    {
        let keys: Vec<TimerKey> = self
            .slots
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect();
        for key in &keys {
            self.cancel(key);
        }
        keys.len()
    }

    pub fn is_scheduled(&self, key: &TimerKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Time remaining until the timer under `key` fires
    pub fn remaining(&self, key: &TimerKey) -> Option<Duration> {
        self.slots
            .get(key)
            .map(|(due, _)| due.saturating_sub(self.now))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pops the earliest timer due no later than `until`, moving the clock to its due time
    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<Action> {
        let (&slot, _) = self.queue.first_key_value()?;
        if slot.0 > until {
            return None;
        }

        let scheduled = self.queue.remove(&slot)?;
        self.slots.remove(&scheduled.key);
        self.now = self.now.max(slot.0);
        Some(scheduled.action)
    }

    pub(crate) fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
