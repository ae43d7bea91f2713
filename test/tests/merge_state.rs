/// Tests for merging change-sets published by peer sculptures

use sculpture::SculptureError;
use sculpture_shared::{DiskState, Game, Status, Value};
use sculpture_test::{
    assert_color, assert_intensity, assert_status, exchange_changes, merge_from, TestSculpture,
};
use serde_json::json;

#[test]
fn own_change_sets_are_ignored() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from("sculpture0", json!({"status": "failure"})))
        .unwrap();

    assert_status!(sculpture, Status::Ready);
    assert!(sculpture.drain_changes().is_empty());
}

#[test]
fn merged_activation_shows_the_senders_color() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from(
            "sculpture1",
            json!({"lights": {"0": {"panels": {"2": {"active": true, "intensity": 100}}}}}),
        ))
        .unwrap();

    assert!(sculpture.lights().is_active("0", "2").unwrap());
    assert_color!(sculpture, "0", "2", "user1");
    assert_intensity!(sculpture, "0", "2", 100);

    let changes = sculpture.drain_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(
        Value::Object(changes[0].changes.clone()),
        json!({"lights": {"0": {"panels": {"2": {"active": true, "color": "user1", "intensity": 100}}}}})
    );
}

#[test]
fn unknown_senders_keep_the_merged_color() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from(
            "visitor",
            json!({"lights": {"1": {"panels": {"4": {"color": "user2", "active": true}}}}}),
        ))
        .unwrap();

    assert!(sculpture.lights().is_active("1", "4").unwrap());
    assert_color!(sculpture, "1", "4", "user2");
}

#[test]
fn merged_max_intensity_is_applied() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from(
            "sculpture2",
            json!({"lights": {"3": {"maxIntensity": 40}}}),
        ))
        .unwrap();

    assert_eq!(sculpture.lights().max_intensity("3").unwrap(), 40);
    assert_eq!(sculpture.lights().max_intensity("0").unwrap(), 100);
}

#[test]
fn merged_current_game_starts_that_game_once() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from("sculpture1", json!({"currentGame": "mole"})))
        .unwrap();
    assert_eq!(sculpture.current_game(), Some(Game::Mole));

    sculpture.press("0", "3");
    sculpture
        .dispatch(merge_from("sculpture1", json!({"currentGame": "mole"})))
        .unwrap();

    // the running game was not restarted
    let count = sculpture
        .state()
        .game_data(Game::Mole)
        .unwrap()
        .get_u32("panelCount")
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn unrecognized_games_are_rejected() {
    let mut sculpture = TestSculpture::new("sculpture0");

    let result = sculpture.dispatch(merge_from("sculpture1", json!({"currentGame": "chess"})));

    assert_eq!(
        result,
        Err(SculptureError::UnrecognizedGame {
            game: "chess".to_string()
        })
    );
    assert_eq!(sculpture.current_game(), None);
}

#[test]
fn null_current_game_is_ignored() {
    let mut sculpture = TestSculpture::new("sculpture0");
    sculpture.start_game(Game::Disk);

    sculpture
        .dispatch(merge_from("sculpture1", json!({"currentGame": null})))
        .unwrap();

    assert_eq!(sculpture.current_game(), Some(Game::Disk));
}

#[test]
fn merged_handshakes_are_tracked() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from(
            "sculpture1",
            json!({"handshakes": {"sculpture1": true, "sculpture2": false}}),
        ))
        .unwrap();

    assert_eq!(
        sculpture.state().active_handshakes().unwrap(),
        vec!["sculpture1"]
    );
}

#[test]
fn merged_game_progress_is_applied() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from(
            "sculpture2",
            json!({"simon": {"level": 2}, "mole": {"panels": {"1,5": "ignored"}}}),
        ))
        .unwrap();

    let state = sculpture.state();
    assert_eq!(state.game_data(Game::Simon).unwrap().get_usize("level").unwrap(), 2);
    assert_eq!(
        state
            .game_data(Game::Mole)
            .unwrap()
            .get_store("panels")
            .unwrap()
            .get_str("1,5")
            .unwrap(),
        "ignored"
    );
}

#[test]
fn merged_disk_state_is_applied() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from(
            "sculpture1",
            json!({"disks": {"disk1": {"position": 120.5, "user": "sculpture1", "state": "homing"}}}),
        ))
        .unwrap();

    let disk = sculpture.state().disk("disk1").unwrap();
    assert_eq!(disk.position().unwrap(), 120.5);
    assert_eq!(disk.user().unwrap(), "sculpture1");
    assert_eq!(disk.state().unwrap(), DiskState::Homing);
}

#[test]
fn unknown_disks_are_rejected() {
    let mut sculpture = TestSculpture::new("sculpture0");

    let result = sculpture.dispatch(merge_from(
        "sculpture1",
        json!({"disks": {"disk9": {"position": 10.0}}}),
    ));

    assert!(matches!(result, Err(SculptureError::Store(_))));
}

#[test]
fn unknown_properties_are_skipped() {
    let mut sculpture = TestSculpture::new("sculpture0");

    sculpture
        .dispatch(merge_from(
            "sculpture1",
            json!({"weather": "sunny", "status": "failure"}),
        ))
        .unwrap();

    assert_status!(sculpture, Status::Failure);
}

#[test]
fn peers_follow_a_started_game() {
    let mut sculpture0 = TestSculpture::new("sculpture0");
    let mut sculpture1 = TestSculpture::new("sculpture1");

    sculpture0.start_game(Game::Disk);
    let delivered = exchange_changes(&mut sculpture0, &mut [&mut sculpture1]).unwrap();

    assert_eq!(delivered, 1);
    assert_eq!(sculpture1.current_game(), Some(Game::Disk));
    assert_intensity!(sculpture1, "3", "4", 100);
}

#[test]
fn peers_see_presses_in_the_pressers_color() {
    let mut sculpture0 = TestSculpture::new("sculpture0");
    let mut sculpture1 = TestSculpture::new("sculpture1");
    let mut sculpture2 = TestSculpture::new("sculpture2");

    sculpture2.press("1", "6");
    exchange_changes(&mut sculpture2, &mut [&mut sculpture0, &mut sculpture1]).unwrap();

    for peer in [&sculpture0, &sculpture1] {
        assert!(peer.lights().is_active("1", "6").unwrap());
        assert_color!(peer, "1", "6", "user2");
    }
}
