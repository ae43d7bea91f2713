use std::time::Duration;

use sculpture::{ChangeEvent, Dispatcher, SculptureConfig, SculptureError, SculptureState, SculptureStore};
use sculpture_shared::{Action, DiskUpdate, Game, LightArray, Status};

/// Seed used for every test sculpture, so random mole panels are repeatable
pub const TEST_SEED: u64 = 7;

/// Long enough for the default status animation to run and finish
pub const STATUS_ANIMATION_TIME: Duration = Duration::from_millis(1500);

/// A sculpture store registered with its own dispatcher and a fixed seed.
/// Time only moves when the test advances it.
pub struct TestSculpture {
    dispatcher: Dispatcher<SculptureStore>,
}

impl TestSculpture {
    pub fn new(username: &str) -> Self {
        Self::with_config(SculptureConfig::for_user(username))
    }

    pub fn with_config(config: SculptureConfig) -> Self {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(SculptureStore::with_seed(config, TEST_SEED))
            .expect("a new dispatcher accepts a handler");
        Self { dispatcher }
    }

    pub fn store(&self) -> &SculptureStore {
        self.dispatcher.handler().expect("store is registered")
    }

    pub fn store_mut(&mut self) -> &mut SculptureStore {
        self.dispatcher.handler_mut().expect("store is registered")
    }

    pub fn dispatcher(&self) -> &Dispatcher<SculptureStore> {
        &self.dispatcher
    }

    pub fn username(&self) -> &str {
        self.store().username()
    }

    pub fn state(&self) -> &SculptureState {
        self.store().state()
    }

    pub fn lights(&self) -> &LightArray {
        self.state().lights()
    }

    pub fn status(&self) -> Status {
        self.state().status().expect("status is always tracked")
    }

    pub fn current_game(&self) -> Option<Game> {
        self.store().current_game()
    }

    pub fn now(&self) -> Duration {
        self.dispatcher.now()
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), SculptureError> {
        self.dispatcher.dispatch(action)
    }

    pub fn start_game(&mut self, game: Game) {
        self.dispatch(Action::start_game(game))
            .expect("game starts");
    }

    pub fn press(&mut self, strip_id: &str, panel_id: &str) {
        self.dispatch(Action::panel_pressed(strip_id, panel_id, true))
            .expect("press is handled");
    }

    pub fn release(&mut self, strip_id: &str, panel_id: &str) {
        self.dispatch(Action::panel_pressed(strip_id, panel_id, false))
            .expect("release is handled");
    }

    /// Press and release a panel
    pub fn tap(&mut self, strip_id: &str, panel_id: &str) {
        self.press(strip_id, panel_id);
        self.release(strip_id, panel_id);
    }

    /// Report a new disk position, as a disk controller would
    pub fn rotate_disk(&mut self, disk_id: &str, position: f64) {
        let update = DiskUpdate {
            position: Some(position),
            ..DiskUpdate::default()
        };
        if let Some(action) = Action::disk_update(disk_id, update) {
            self.dispatch(action).expect("disk update is handled");
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.dispatcher.advance(elapsed).expect("timers are handled");
    }

    pub fn advance_ms(&mut self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Let a running status animation finish and restore the status
    pub fn finish_status_animation(&mut self) {
        self.advance(STATUS_ANIMATION_TIME);
    }

    pub fn drain_changes(&mut self) -> Vec<ChangeEvent> {
        self.store_mut().drain_changes()
    }

    /// Published change-sets, wrapped as the merge actions peers receive
    pub fn drain_merges(&mut self) -> Vec<Action> {
        let changes = self.drain_changes();
        let store = self.store();
        changes
            .into_iter()
            .map(|event| store.outgoing_merge(event.changes))
            .collect()
    }
}

/// A `merge-state` action as published by `from`. `changes` must be a JSON object.
pub fn merge_from(from: &str, changes: serde_json::Value) -> Action {
    let changes = match changes {
        serde_json::Value::Object(changes) => changes,
        other => panic!("merge changes must be an object, got {}", other),
    };
    Action::merge_state(from, changes)
}
