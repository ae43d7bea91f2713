/// Tests for the store's action cycle: locking, out-of-cycle mutation
/// detection, change publishing and the status animation

use sculpture::{Dispatcher, SculptureConfig, SculptureError, SculptureStore, PANEL_ANIMATION};
use sculpture_shared::{Action, Status, Value};
use sculpture_test::{assert_color, assert_intensity, assert_status, merge_from, TestSculpture};
use serde_json::json;

fn locked_sculpture() -> TestSculpture {
    let mut sculpture = TestSculpture::new("sculpture0");
    let store = sculpture.store_mut();
    store.lock().unwrap();
    store.publish_changes();
    sculpture
}

#[test]
fn locked_sculptures_drop_local_actions() {
    let mut sculpture = locked_sculpture();
    sculpture.drain_changes();

    sculpture.press("0", "1");
    sculpture.dispatch(Action::StartNextGame).unwrap();

    assert_status!(sculpture, Status::Locked);
    assert!(!sculpture.lights().is_active("0", "1").unwrap());
    assert_eq!(sculpture.current_game(), None);
    assert!(sculpture.drain_changes().is_empty());
}

#[test]
fn locked_sculptures_still_merge() {
    let mut sculpture = locked_sculpture();

    sculpture
        .dispatch(merge_from("sculpture1", json!({"status": "ready"})))
        .unwrap();

    assert_status!(sculpture, Status::Ready);
    sculpture.press("0", "1");
    assert!(sculpture.lights().is_active("0", "1").unwrap());
}

#[test]
fn mutation_outside_of_a_cycle_is_refused() {
    let mut sculpture = TestSculpture::new("sculpture0");
    sculpture
        .store_mut()
        .state_mut()
        .set_status(Status::Failure)
        .unwrap();

    let result = sculpture.dispatch(Action::StartNextGame);

    assert_eq!(
        result,
        Err(SculptureError::OutOfCycleMutation {
            changed: "status".to_string()
        })
    );
    assert_eq!(sculpture.current_game(), None);
}

#[test]
fn publishing_after_an_outside_mutation_recovers() {
    let mut sculpture = TestSculpture::new("sculpture0");
    sculpture
        .store_mut()
        .state_mut()
        .lights_mut()
        .set_intensity("6", None, 100)
        .unwrap();
    sculpture.store_mut().publish_changes();

    sculpture.dispatch(Action::StartNextGame).unwrap();

    let changes = sculpture.drain_changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(
        changes[1].changes.get("currentGame"),
        Some(&json!("handshake"))
    );
}

#[test]
fn each_cycle_publishes_one_change_set() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture.press("2", "9");
    sculpture.release("2", "9");
    sculpture.dispatch(Action::RestoreStatus).unwrap();

    let changes = sculpture.drain_changes();
    assert_eq!(changes.len(), 3);
    assert_eq!(
        Value::Object(changes[0].changes.clone()),
        json!({"lights": {"2": {"panels": {"9": {"active": true, "color": "user0"}}}}})
    );
    assert_eq!(
        Value::Object(changes[2].changes.clone()),
        json!({"status": "ready"})
    );
}

#[test]
fn failed_cycles_still_publish_what_they_changed() {
    let mut sculpture = TestSculpture::new("sculpture0");

    let result = sculpture.dispatch(merge_from(
        "sculpture1",
        json!({"handshakes": {"sculpture1": true}, "lights": {"9": {"maxIntensity": 10}}}),
    ));

    assert!(result.is_err());
    let changes = sculpture.drain_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes[0].changes.get("handshakes"),
        Some(&json!({"sculpture1": true}))
    );

    // the next cycle starts clean
    sculpture.dispatch(Action::RestoreStatus).unwrap();
}

#[test]
fn status_animation_blinks_and_restores_ready() {
    let mut sculpture = TestSculpture::new("sculpture1");

    sculpture
        .dispatch(merge_from("sculpture2", json!({"status": "success"})))
        .unwrap();
    assert_eq!(
        sculpture.state().data().get(PANEL_ANIMATION).unwrap(),
        &json!("status")
    );

    sculpture.advance_ms(250);
    assert_color!(sculpture, "5", "3", "user1");
    assert_intensity!(sculpture, "5", "3", 100);

    sculpture.advance_ms(250);
    assert_intensity!(sculpture, "5", "3", 0);

    sculpture.advance_ms(1000);
    assert_status!(sculpture, Status::Ready);
    assert_eq!(
        sculpture.state().data().get(PANEL_ANIMATION).unwrap(),
        &Value::Null
    );
    assert!(sculpture.dispatcher().scheduler().is_empty());
}

#[test]
fn locking_plays_no_animation() {
    let sculpture = locked_sculpture();

    assert!(sculpture.state().animation().is_none());
    assert!(sculpture.dispatcher().scheduler().is_empty());
}

#[test]
fn users_without_a_color_use_the_default() {
    let mut sculpture = TestSculpture::with_config(SculptureConfig::for_user("sculpture9"));

    sculpture.press("0", "0");

    assert_eq!(sculpture.store().user_color(), "white");
    assert_color!(sculpture, "0", "0", "white");
}

#[test]
fn only_one_store_may_be_registered() {
    let mut dispatcher = Dispatcher::new();
    let token = dispatcher
        .register(SculptureStore::new(SculptureConfig::default()))
        .unwrap();

    assert_eq!(
        dispatcher
            .register(SculptureStore::new(SculptureConfig::default()))
            .err(),
        Some(SculptureError::HandlerAlreadyRegistered)
    );

    assert!(dispatcher.unregister(token).is_some());
    assert_eq!(
        dispatcher.dispatch(Action::RestoreStatus),
        Err(SculptureError::NoHandlerRegistered)
    );
}
